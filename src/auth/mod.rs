//! Login, logout and session reads.

mod error;
mod session;

pub use error::*;
pub use session::*;

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::UserClient;
use crate::domain::{User, UserType};
use crate::signals::{Notifier, Subscription};
use crate::store::{keys, LocalStore};
use crate::user_actor::UserError;

/// Session management on top of the user repository and a bundled list of
/// predefined accounts.
#[derive(Clone)]
pub struct AuthService {
    store: LocalStore,
    users: UserClient,
    predefined: Vec<User>,
    notifier: Notifier,
}

impl AuthService {
    pub fn new(store: LocalStore, users: UserClient, predefined: Vec<User>) -> Self {
        Self {
            store,
            users,
            predefined,
            notifier: Notifier::new("auth-changed"),
        }
    }

    /// Auth-changed signal. Fires after login and logout.
    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Checks registered users first, then the predefined accounts.
    /// Passwords are compared verbatim.
    #[instrument(skip(self, secret))]
    pub async fn login(&self, email: &str, secret: &str) -> Result<LoginOutcome, AuthError> {
        let registered = match self.users.find_by_email(email.to_string()).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "User lookup failed, trying predefined accounts");
                None
            }
        };
        let user = registered
            .filter(|user| user.password == secret)
            .or_else(|| {
                self.predefined
                    .iter()
                    .find(|user| user.email.eq_ignore_ascii_case(email.trim()) && user.password == secret)
                    .cloned()
            });

        let Some(user) = user else {
            info!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let session = Session::start(&user, Utc::now());
        if !self.store.save(keys::SESSION, &session) {
            return Err(AuthError::SessionNotSaved);
        }
        if !self.store.save(keys::ROLE, &user.user_type) {
            // a session without its role must not outlive the failed login
            if !self.store.remove(keys::SESSION) {
                error!(run = %user.run, "Partial session left behind after failed login");
            }
            return Err(AuthError::SessionNotSaved);
        }
        self.notifier.notify();

        info!(run = %user.run, user_type = %user.user_type, "Login successful");
        Ok(LoginOutcome {
            redirect: Redirect::for_role(user.user_type),
            session,
        })
    }

    /// Clears the session, then the role. Nothing is announced unless both
    /// keys are gone.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<Redirect, AuthError> {
        if !self.store.remove(keys::SESSION) {
            error!("Session could not be removed");
            return Err(AuthError::SessionNotCleared);
        }
        if !self.store.remove(keys::ROLE) {
            error!("Role could not be removed");
            return Err(AuthError::SessionNotCleared);
        }
        self.notifier.notify();
        debug!("Session cleared");
        Ok(Redirect::StorefrontHome)
    }

    /// Rewrites the stored session after the signed-in account changed.
    /// The login time is kept. Returns `false` when `user` is not the one
    /// signed in or the write failed.
    pub fn refresh_session(&self, user: &User) -> bool {
        let Some(current) = self.current_user().filter(|session| session.id == user.run) else {
            return false;
        };
        let session = Session::start(user, current.login_time);
        if !self.store.save(keys::SESSION, &session) {
            return false;
        }
        self.notifier.notify();
        true
    }

    pub fn current_user(&self) -> Option<Session> {
        self.store.load(keys::SESSION)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    fn role(&self) -> Option<UserType> {
        self.store.load(keys::ROLE)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserType::Admin)
    }

    pub fn is_client(&self) -> bool {
        self.role() == Some(UserType::Client)
    }

    /// Guard for admin pages.
    pub fn admin_access(&self) -> AccessDecision {
        if !self.is_authenticated() {
            AccessDecision::RedirectToLogin
        } else if !self.is_admin() {
            AccessDecision::RedirectToHome
        } else {
            AccessDecision::Allowed
        }
    }

    /// Whether a registered account already uses `email`.
    #[instrument(skip(self))]
    pub async fn identifier_in_use(&self, email: &str) -> Result<bool, UserError> {
        self.users.email_in_use(email.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::store::{MemoryBackend, StorageBackend, StorageError};

    /// Memory storage that refuses every write and delete of one key.
    struct RejectKey {
        inner: MemoryBackend,
        key: &'static str,
    }

    impl RejectKey {
        fn check(&self, key: &str) -> Result<(), StorageError> {
            if key == self.key {
                return Err(StorageError::Io {
                    key: key.to_string(),
                    message: "read-only".into(),
                });
            }
            Ok(())
        }
    }

    impl StorageBackend for RejectKey {
        fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_raw(key)
        }

        fn put_raw(&self, key: &str, value: String) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.put_raw(key, value)
        }

        fn delete_raw(&self, key: &str) -> Result<(), StorageError> {
            self.check(key)?;
            self.inner.delete_raw(key)
        }
    }

    async fn setup() -> (AuthService, LocalStore) {
        setup_with(LocalStore::in_memory()).await
    }

    async fn setup_with(store: LocalStore) -> (AuthService, LocalStore) {
        let (actor, inner) = ResourceActor::<User>::new(8, store.clone());
        tokio::spawn(actor.run());
        let users = UserClient::new(inner);

        let mut client = User::new("12345678", "Ana", "Rojas", "ana@gmail.com");
        client.password = "secreto1".into();
        users.reset(vec![client]).await.unwrap();

        let mut admin = User::new("11111111", "Admin", "Junimo", "admin@duoc.cl");
        admin.user_type = UserType::Admin;
        admin.password = "admin123".into();

        (AuthService::new(store.clone(), users, vec![admin]), store)
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_fail_identically() {
        let (auth, _) = setup().await;
        let unknown = auth.login("nadie@gmail.com", "secreto1").await.unwrap_err();
        let wrong = auth.login("ana@gmail.com", "otra-clave").await.unwrap_err();
        assert_eq!(unknown, AuthError::InvalidCredentials);
        assert_eq!(unknown, wrong);
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_client_login_persists_session_and_role() {
        let (auth, store) = setup().await;
        let mut changes = auth.subscribe();

        let outcome = auth.login("ana@gmail.com", "secreto1").await.unwrap();
        assert_eq!(outcome.redirect, Redirect::StorefrontHome);
        assert_eq!(outcome.session.id, "12345678");
        assert!(changes.has_changed());

        assert_eq!(auth.current_user(), Some(outcome.session));
        assert_eq!(store.load::<UserType>(keys::ROLE), Some(UserType::Client));
        assert!(auth.is_client());
        assert!(!auth.is_admin());
        assert_eq!(auth.admin_access(), AccessDecision::RedirectToHome);
    }

    #[tokio::test]
    async fn test_predefined_admin_lands_on_dashboard() {
        let (auth, _) = setup().await;
        let outcome = auth.login("admin@duoc.cl", "admin123").await.unwrap();
        assert_eq!(outcome.redirect, Redirect::AdminDashboard);
        assert_eq!(outcome.redirect.path(), "/admin/dashboard");
        assert_eq!(auth.admin_access(), AccessDecision::Allowed);
    }

    #[tokio::test]
    async fn test_logout_clears_both_keys() {
        let (auth, store) = setup().await;
        auth.login("ana@gmail.com", "secreto1").await.unwrap();
        let mut changes = auth.subscribe();

        assert_eq!(auth.logout(), Ok(Redirect::StorefrontHome));
        assert!(changes.has_changed());
        assert!(!auth.is_authenticated());
        assert_eq!(store.load::<UserType>(keys::ROLE), None);
        assert_eq!(auth.admin_access(), AccessDecision::RedirectToLogin);
        assert_eq!(AccessDecision::RedirectToLogin.redirect(), Some(Redirect::Login));
    }

    #[tokio::test]
    async fn test_identifier_in_use_checks_registered_accounts() {
        let (auth, _) = setup().await;
        assert_eq!(auth.identifier_in_use("ANA@gmail.com").await, Ok(true));
        assert_eq!(auth.identifier_in_use("admin@duoc.cl").await, Ok(false));
    }

    #[tokio::test]
    async fn test_failed_role_write_leaves_no_session() {
        let store = LocalStore::new(RejectKey {
            inner: MemoryBackend::new(),
            key: keys::ROLE,
        });
        let (auth, store) = setup_with(store).await;
        let mut changes = auth.subscribe();

        assert_eq!(
            auth.login("ana@gmail.com", "secreto1").await,
            Err(AuthError::SessionNotSaved)
        );
        assert!(!auth.is_authenticated());
        assert_eq!(auth.current_user(), None);
        assert_eq!(store.load::<Session>(keys::SESSION), None);
        assert!(!changes.has_changed());
    }

    #[tokio::test]
    async fn test_logout_reports_a_session_it_cannot_remove() {
        let inner = MemoryBackend::new();
        let user = User::new("12345678", "Ana", "Rojas", "ana@gmail.com");
        let session = Session::start(&user, Utc::now());
        inner
            .put_raw(keys::SESSION, serde_json::to_string(&session).unwrap())
            .unwrap();
        let store = LocalStore::new(RejectKey {
            inner,
            key: keys::SESSION,
        });
        let (auth, _) = setup_with(store).await;
        let mut changes = auth.subscribe();

        assert_eq!(auth.logout(), Err(AuthError::SessionNotCleared));
        assert!(!changes.has_changed());
        assert_eq!(auth.current_user(), Some(session));
    }
}
