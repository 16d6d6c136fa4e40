use std::fmt::Display;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use super::{CheckoutService, StoreConfig, SystemError};
use crate::actor_framework::ResourceActor;
use crate::admin::{DashboardService, OrderAdmin, UserAdmin};
use crate::auth::AuthService;
use crate::cart::{CartClient, CartService};
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::{Order, Product, User};
use crate::profile::ProfileService;
use crate::registration::RegistrationService;
use crate::seed::SeedData;
use crate::store::{FileBackend, LocalStore};

fn init_failed(e: impl Display) -> SystemError {
    SystemError::Initialization(e.to_string())
}

/// The running store: repository actors, the cart service and the
/// services built on top of them.
///
/// Responsible for starting up actors, seeding them and shutting them down.
pub struct StoreSystem {
    pub config: StoreConfig,
    pub store: LocalStore,
    pub products: ProductClient,
    pub users: UserClient,
    pub orders: OrderClient,
    pub cart: CartClient,
    pub auth: AuthService,
    pub registration: RegistrationService,
    pub profile: ProfileService,
    pub checkout: CheckoutService,
    pub user_admin: UserAdmin,
    pub order_admin: OrderAdmin,
    pub dashboard: DashboardService,
    seed: SeedData,
    handles: Vec<JoinHandle<()>>,
}

impl StoreSystem {
    /// Opens the store the configuration points at and starts everything.
    pub async fn start(config: StoreConfig) -> Result<Self, SystemError> {
        let store = if config.in_memory {
            LocalStore::in_memory()
        } else {
            let backend = FileBackend::open(&config.data_dir).map_err(|e| SystemError::Storage(e.to_string()))?;
            LocalStore::new(backend)
        };
        Self::start_with_store(config, store).await
    }

    #[instrument(name = "store_system_start", skip_all, fields(in_memory = config.in_memory))]
    pub async fn start_with_store(config: StoreConfig, store: LocalStore) -> Result<Self, SystemError> {
        let seed = SeedData::bundled().map_err(init_failed)?;
        let academic_discount = config.academic_discount()?;
        let buffer = config.channel_buffer;

        // 1. Repository actors
        let (product_actor, product_inner) = ResourceActor::<Product>::new(buffer, store.clone());
        let (user_actor, user_inner) = ResourceActor::<User>::new(buffer, store.clone());
        let (order_actor, order_inner) = ResourceActor::<Order>::new(buffer, store.clone());
        let products = ProductClient::new(product_inner);
        let users = UserClient::new(user_inner);
        let orders = OrderClient::new(order_inner);
        let mut handles = vec![
            tokio::spawn(product_actor.run()),
            tokio::spawn(user_actor.run()),
            tokio::spawn(order_actor.run()),
        ];

        // 2. Cart service, which talks to the product actor
        let (cart_service, cart) = CartService::new(buffer, store.clone(), products.clone());
        handles.push(tokio::spawn(cart_service.run()));

        // 3. Plain services over the clients
        let auth = AuthService::new(store.clone(), users.clone(), seed.predefined_admins());
        let registration = RegistrationService::new(users.clone(), academic_discount);
        let checkout = CheckoutService::new(
            auth.clone(),
            users.clone(),
            products.clone(),
            orders.clone(),
            cart.clone(),
            config.shipping_policy(),
        );
        let dashboard = DashboardService::new(
            products.clone(),
            users.clone(),
            orders.clone(),
            config.latest_orders_limit,
        );

        let system = Self {
            profile: ProfileService::new(auth.clone(), users.clone()),
            user_admin: UserAdmin::new(users.clone()),
            order_admin: OrderAdmin::new(orders.clone()),
            config,
            store,
            products,
            users,
            orders,
            cart,
            auth,
            registration,
            checkout,
            dashboard,
            seed,
            handles,
        };

        system.bootstrap().await?;
        info!("Store system started");
        Ok(system)
    }

    /// Seeds empty collections. An empty catalog afterwards, or a failed
    /// first attempt, triggers one forced reset.
    async fn bootstrap(&self) -> Result<(), SystemError> {
        let needs_reset = match self.initialize().await {
            Ok(()) => match self.products.list_products().await {
                Ok(products) => products.is_empty(),
                Err(e) => {
                    warn!(error = %e, "Catalog unreadable after initialization");
                    true
                }
            },
            Err(e) => {
                warn!(error = %e, "Initialization failed");
                true
            }
        };
        if !needs_reset {
            return Ok(());
        }

        warn!("Forcing a reset of the reference data");
        self.reset_data().await.inspect_err(|e| {
            error!(error = %e, "Emergency reset failed");
        })
    }

    async fn initialize(&self) -> Result<(), SystemError> {
        self.products
            .initialize(self.seed.products.clone())
            .await
            .map_err(init_failed)?;
        self.users
            .initialize(self.seed.users.clone())
            .await
            .map_err(init_failed)?;
        self.orders
            .initialize(self.seed.orders.clone())
            .await
            .map_err(init_failed)?;
        Ok(())
    }

    /// Overwrites every collection with the bundled reference data.
    #[instrument(skip(self))]
    pub async fn reset_data(&self) -> Result<(), SystemError> {
        self.products
            .reset(self.seed.products.clone())
            .await
            .map_err(init_failed)?;
        self.users
            .reset(self.seed.users.clone())
            .await
            .map_err(init_failed)?;
        self.orders
            .reset(self.seed.orders.clone())
            .await
            .map_err(init_failed)?;
        Ok(())
    }

    /// Stops the cart service, drops every client so the repository actors
    /// see their channels close, then waits for all tasks.
    pub async fn shutdown(mut self) -> Result<(), SystemError> {
        info!("Shutting down store system");
        if let Err(e) = self.cart.shutdown().await {
            warn!(error = %e, "Cart service already stopped");
        }

        let handles = std::mem::take(&mut self.handles);
        drop(self);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("Store system stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{keys, MemoryBackend, StorageBackend, StorageError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_start_seeds_an_empty_store() {
        let system = StoreSystem::start(StoreConfig::in_memory()).await.unwrap();
        let seed = SeedData::bundled().unwrap();
        assert_eq!(system.products.list_products().await.unwrap(), seed.products);
        assert_eq!(system.users.list_users().await.unwrap().len(), seed.users.len());
        assert_eq!(system.orders.list_orders().await.unwrap().len(), seed.orders.len());
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_existing_data_is_kept_across_restarts() {
        let store = LocalStore::in_memory();
        let first = StoreSystem::start_with_store(StoreConfig::in_memory(), store.clone()).await.unwrap();
        first.products.remove_product("PS001".into()).await.unwrap();
        let remaining = first.products.list_products().await.unwrap();
        first.shutdown().await.unwrap();

        let second = StoreSystem::start_with_store(StoreConfig::in_memory(), store).await.unwrap();
        assert_eq!(second.products.list_products().await.unwrap(), remaining);
        second.shutdown().await.unwrap();
    }

    /// Fails the first `failures` writes, then behaves like memory.
    struct FlakyBackend {
        inner: MemoryBackend,
        failures: AtomicUsize,
    }

    impl StorageBackend for FlakyBackend {
        fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_raw(key)
        }

        fn put_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(StorageError::Io {
                    key: key.to_string(),
                    message: "disk full".into(),
                });
            }
            self.inner.put_raw(key, value)
        }

        fn delete_raw(&self, key: &str) -> Result<(), StorageError> {
            self.inner.delete_raw(key)
        }
    }

    #[tokio::test]
    async fn test_failed_initialization_falls_back_to_one_reset() {
        let inner = MemoryBackend::new();
        let stale = vec![User::new("1234567", "Ana", "Rojas", "ana@gmail.com")];
        inner.put_raw(keys::USERS, serde_json::to_string(&stale).unwrap()).unwrap();
        let store = LocalStore::new(FlakyBackend {
            inner,
            failures: AtomicUsize::new(1),
        });

        let system = StoreSystem::start_with_store(StoreConfig::in_memory(), store).await.unwrap();
        // the reset overwrites every collection, users included
        let seed = SeedData::bundled().unwrap();
        assert_eq!(system.products.list_products().await.unwrap(), seed.products);
        assert_eq!(system.users.list_users().await.unwrap(), seed.users);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_unwritable_store_fails_startup() {
        let store = LocalStore::new(MemoryBackend::with_quota(8));
        let result = StoreSystem::start_with_store(StoreConfig::in_memory(), store).await;
        assert!(matches!(result, Err(SystemError::Initialization(_))));
    }
}
