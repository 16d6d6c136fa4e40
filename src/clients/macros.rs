/// Generates the CRUD surface of a typed repository client on top of
/// [`ResourceClient`](crate::actor_framework::ResourceClient), mapping
/// framework errors into the domain error and tracing every call.
macro_rules! impl_repository_client {
    ($client_name:ident, $entity:ty, $patch:ty, $error:ty, $snake:ident, $plural:ident) => {
        ::paste::paste! {
            impl $client_name {
                pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                    Self { inner }
                }

                /// Seeds the collection if it is missing, malformed or empty.
                #[tracing::instrument(skip(self, seed), fields(seed = seed.len()))]
                pub async fn initialize(&self, seed: Vec<$entity>) -> Result<bool, $error> {
                    tracing::debug!("Sending request");
                    self.inner.initialize(seed).await.map_err(<$error>::from)
                }

                /// Overwrites the collection with `seed`.
                #[tracing::instrument(skip(self, seed), fields(seed = seed.len()))]
                pub async fn reset(&self, seed: Vec<$entity>) -> Result<(), $error> {
                    tracing::debug!("Sending request");
                    self.inner.reset(seed).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<list_ $plural>](&self) -> Result<Vec<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.list().await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $snake>](&self, key: String) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(key).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self, entity), fields(key = %$crate::actor_framework::Entity::key(&entity)))]
                pub async fn [<add_ $snake>](&self, entity: $entity) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    self.inner.create(entity).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self, patch))]
                pub async fn [<update_ $snake>](
                    &self,
                    key: String,
                    patch: $patch,
                ) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.update(key, patch).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<remove_ $snake>](&self, key: String) -> Result<bool, $error> {
                    tracing::debug!("Sending request");
                    self.inner.delete(key).await.map_err(<$error>::from)
                }
            }
        }
    };
}

/// Generates a request/response client method for a hand-written service
/// actor. Channel failures surface as `$error::ActorCommunicationError`.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, $error:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> std::result::Result<$return_type, $error> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|e| $error::ActorCommunicationError(e.to_string()))?;
                response
                    .await
                    .map_err(|e| $error::ActorCommunicationError(e.to_string()))?
            }
        }
    };
}
