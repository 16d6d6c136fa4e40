//! Generic repository actor.
//!
//! A [`ResourceActor`] owns one entity collection persisted in the
//! [`LocalStore`] and serializes every request through its mailbox. Each request
//! re-reads the collection from the store, so the store stays the source of
//! truth. [`ResourceClient`] is the cloneable handle used by the typed clients.

use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::store::LocalStore;

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Patches, and Actions)
// =============================================================================

/// Trait that any persisted record must implement to be managed by [`ResourceActor`].
pub trait Entity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Key: Eq + Clone + Send + Sync + Display + Debug + 'static;
    type Patch: Send + Sync + Debug + 'static;
    type Action: Send + Sync + Debug + 'static;
    type ActionResult: Send + Sync + Debug + 'static;

    /// Storage key of the whole collection.
    const COLLECTION: &'static str;

    /// The natural key.
    fn key(&self) -> &Self::Key;

    // --- Lifecycle Hooks ---

    /// Applies defaults and checks invariants before the first persist.
    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    /// Handle a custom domain-specific action. The collection is persisted
    /// only when this returns `Ok`.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Failed to persist collection {0}")]
    Storage(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate used by [`ResourceRequest::Find`].
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send>;

pub enum ResourceRequest<T: Entity> {
    Initialize {
        seed: Vec<T>,
        respond_to: Response<bool>,
    },
    Reset {
        seed: Vec<T>,
        respond_to: Response<()>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Find {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Get {
        key: T::Key,
        respond_to: Response<Option<T>>,
    },
    Create {
        entity: T,
        respond_to: Response<T>,
    },
    Update {
        key: T::Key,
        patch: T::Patch,
        respond_to: Response<Option<T>>,
    },
    Delete {
        key: T::Key,
        respond_to: Response<bool>,
    },
    Action {
        key: T::Key,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

impl<T: Entity> Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialize { seed, .. } => write!(f, "Initialize({} seed items)", seed.len()),
            Self::Reset { seed, .. } => write!(f, "Reset({} seed items)", seed.len()),
            Self::List { .. } => write!(f, "List"),
            Self::Find { .. } => write!(f, "Find"),
            Self::Get { key, .. } => write!(f, "Get({key})"),
            Self::Create { entity, .. } => write!(f, "Create({})", entity.key()),
            Self::Update { key, patch, .. } => write!(f, "Update({key}, {patch:?})"),
            Self::Delete { key, .. } => write!(f, "Delete({key})"),
            Self::Action { key, action, .. } => write!(f, "Action({key}, {action:?})"),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: LocalStore,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(buffer_size: usize, store: LocalStore) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, store };
        (actor, ResourceClient::new(sender))
    }

    /// Runs until every client handle is dropped.
    #[instrument(name = "resource_actor", fields(collection = T::COLLECTION), skip(self))]
    pub async fn run(mut self) {
        info!("Repository actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Initialize { seed, respond_to } => {
                    let _ = respond_to.send(self.initialize(seed));
                }
                ResourceRequest::Reset { seed, respond_to } => {
                    let _ = respond_to.send(self.reset(&seed));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.load()));
                }
                ResourceRequest::Find { filter, respond_to } => {
                    let found = self.load().into_iter().filter(|item| filter(item)).collect();
                    let _ = respond_to.send(Ok(found));
                }
                ResourceRequest::Get { key, respond_to } => {
                    let item = self.load().into_iter().find(|item| item.key() == &key);
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Create { entity, respond_to } => {
                    let _ = respond_to.send(self.create(entity));
                }
                ResourceRequest::Update {
                    key,
                    patch,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.update(key, patch));
                }
                ResourceRequest::Delete { key, respond_to } => {
                    let _ = respond_to.send(self.delete(key));
                }
                ResourceRequest::Action {
                    key,
                    action,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.action(key, action));
                }
            }
        }
        info!("Repository actor stopped");
    }

    fn load(&self) -> Vec<T> {
        self.store.load(T::COLLECTION).unwrap_or_default()
    }

    fn persist(&self, items: &[T]) -> Result<(), FrameworkError> {
        if self.store.save(T::COLLECTION, items) {
            Ok(())
        } else {
            Err(FrameworkError::Storage(T::COLLECTION.to_string()))
        }
    }

    /// Seeds when the stored value is missing, not an array of `T`, or empty.
    fn initialize(&self, seed: Vec<T>) -> Result<bool, FrameworkError> {
        match self.store.load::<Vec<T>>(T::COLLECTION) {
            Some(items) if !items.is_empty() => {
                debug!(count = items.len(), "Collection already initialized");
                Ok(false)
            }
            _ => {
                self.persist(&seed)?;
                info!(count = seed.len(), "Collection seeded");
                Ok(true)
            }
        }
    }

    fn reset(&self, seed: &[T]) -> Result<(), FrameworkError> {
        self.persist(seed)?;
        warn!(count = seed.len(), "Collection reset to reference data");
        Ok(())
    }

    #[instrument(fields(key = %entity.key()), skip(self, entity))]
    fn create(&self, mut entity: T) -> Result<T, FrameworkError> {
        let mut items = self.load();
        if items.iter().any(|item| item.key() == entity.key()) {
            debug!("Duplicate key rejected");
            return Err(FrameworkError::DuplicateKey(entity.key().to_string()));
        }
        entity.on_create().map_err(FrameworkError::Rejected)?;
        items.push(entity.clone());
        self.persist(&items)?;
        info!("Item created");
        Ok(entity)
    }

    #[instrument(fields(key = %key), skip(self, patch))]
    fn update(&self, key: T::Key, patch: T::Patch) -> Result<Option<T>, FrameworkError> {
        let mut items = self.load();
        let Some(item) = items.iter_mut().find(|item| item.key() == &key) else {
            debug!("Update target not found");
            return Ok(None);
        };
        item.on_update(patch).map_err(FrameworkError::Rejected)?;
        let updated = item.clone();
        self.persist(&items)?;
        info!("Item updated");
        Ok(Some(updated))
    }

    #[instrument(fields(key = %key), skip(self))]
    fn delete(&self, key: T::Key) -> Result<bool, FrameworkError> {
        let mut items = self.load();
        let Some(position) = items.iter().position(|item| item.key() == &key) else {
            debug!("Delete target not found");
            return Ok(false);
        };
        items[position].on_delete().map_err(FrameworkError::Rejected)?;
        items.remove(position);
        self.persist(&items)?;
        info!("Item deleted");
        Ok(true)
    }

    #[instrument(fields(key = %key), skip(self))]
    fn action(&self, key: T::Key, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let mut items = self.load();
        let item = items
            .iter_mut()
            .find(|item| item.key() == &key)
            .ok_or_else(|| FrameworkError::NotFound(key.to_string()))?;
        let result = item.handle_action(action).map_err(FrameworkError::Rejected)?;
        self.persist(&items)?;
        Ok(result)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn initialize(&self, seed: Vec<T>) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Initialize { seed, respond_to })
            .await
    }

    pub async fn reset(&self, seed: Vec<T>) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Reset { seed, respond_to })
            .await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn find(
        &self,
        filter: impl Fn(&T) -> bool + Send + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        let filter: Filter<T> = Box::new(filter);
        self.request(|respond_to| ResourceRequest::Find { filter, respond_to })
            .await
    }

    pub async fn get(&self, key: T::Key) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { key, respond_to })
            .await
    }

    pub async fn create(&self, entity: T) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { entity, respond_to })
            .await
    }

    pub async fn update(&self, key: T::Key, patch: T::Patch) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            key,
            patch,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, key: T::Key) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { key, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        key: T::Key,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            key,
            action,
            respond_to,
        })
        .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
