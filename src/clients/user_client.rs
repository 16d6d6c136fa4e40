use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{User, UserPatch, UserType};
use crate::user_actor::UserError;

/// Client for the user repository actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_repository_client!(UserClient, User, UserPatch, UserError, user, users);

impl UserClient {
    #[instrument(skip(self))]
    pub async fn users_by_type(&self, user_type: UserType) -> Result<Vec<User>, UserError> {
        debug!("Sending request");
        Ok(self.inner.find(move |u| u.user_type == user_type).await?)
    }

    /// Case-insensitive lookup by email.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: String) -> Result<Option<User>, UserError> {
        debug!("Sending request");
        let email = email.trim().to_lowercase();
        let mut found = self
            .inner
            .find(move |u| u.email.to_lowercase() == email)
            .await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    #[instrument(skip(self))]
    pub async fn email_in_use(&self, email: String) -> Result<bool, UserError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
