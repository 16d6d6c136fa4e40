use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{contains_ci, AdminError};
use crate::clients::UserClient;
use crate::domain::{User, UserPatch, UserType};
use crate::registration::user_from_form;
use crate::user_actor::UserError;
use crate::validation::{self, Flow, RegistrationForm};

/// Filters for the user table. Text filters are case-insensitive substrings.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub run: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<UserType>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        contains_ci(&user.run, self.run.as_deref())
            && contains_ci(&user.full_name(), self.name.as_deref())
            && contains_ci(&user.email, self.email.as_deref())
            && self.user_type.map_or(true, |t| t == user.user_type)
    }
}

/// Headline numbers for the user table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub clients: usize,
    pub admins: usize,
    pub with_discount: usize,
}

impl UserStats {
    pub fn from_users(users: &[User]) -> Self {
        users.iter().fold(Self::default(), |mut stats, user| {
            stats.total += 1;
            match user.user_type {
                UserType::Client => stats.clients += 1,
                UserType::Admin => stats.admins += 1,
            }
            if user.discount.is_some_and(|d| !d.is_zero()) {
                stats.with_discount += 1;
            }
            stats
        })
    }
}

#[derive(Clone)]
pub struct UserAdmin {
    users: UserClient,
}

impl UserAdmin {
    pub fn new(users: UserClient) -> Self {
        Self { users }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, AdminError> {
        let mut users = self.users.list_users().await?;
        users.retain(|user| filter.matches(user));
        Ok(users)
    }

    /// Creates an account with the admin form rules. The role comes from
    /// the form; no discount is granted.
    #[instrument(skip(self, form), fields(run = %form.run, user_type = %form.user_type))]
    pub async fn create(&self, form: RegistrationForm, today: NaiveDate) -> Result<User, AdminError> {
        let report = validation::validate_all(&form, Flow::Admin, today);
        if !report.valid {
            return Err(AdminError::Invalid(report));
        }
        if self.users.email_in_use(form.email.clone()).await? {
            return Err(AdminError::DuplicateEmail(form.email.trim().to_string()));
        }

        let user = user_from_form(&form, form.user_type, None);
        match self.users.add_user(user).await {
            Ok(stored) => {
                info!("User created");
                Ok(stored)
            }
            Err(UserError::AlreadyExists(run)) => Err(AdminError::DuplicateRun(run)),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads `run` and refuses administrator accounts. Runs before every
    /// mutation so a protected account is never written.
    async fn editable(&self, run: &str) -> Result<User, AdminError> {
        let user = self
            .users
            .get_user(run.to_string())
            .await?
            .ok_or_else(|| AdminError::UserNotFound(run.to_string()))?;
        if user.is_admin() {
            warn!(run, "Refusing to modify an administrator");
            return Err(AdminError::ProtectedAdmin(run.to_string()));
        }
        Ok(user)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, run: String, patch: UserPatch) -> Result<User, AdminError> {
        self.editable(&run).await?;
        if let Some(email) = &patch.email {
            if let Some(message) = validation::validate_email(email) {
                let mut report = validation::ValidationReport::default();
                report.errors.insert(validation::Field::Email, message);
                return Err(AdminError::Invalid(report));
            }
            if let Some(owner) = self.users.find_by_email(email.clone()).await? {
                if owner.run != run {
                    return Err(AdminError::DuplicateEmail(email.clone()));
                }
            }
        }
        let updated = self
            .users
            .update_user(run.clone(), patch)
            .await?
            .ok_or(AdminError::UserNotFound(run))?;
        info!("User updated");
        Ok(updated)
    }

    /// Computed over every account, not a filtered view.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<UserStats, AdminError> {
        let users = self.users.list_users().await?;
        Ok(UserStats::from_users(&users))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, run: String) -> Result<(), AdminError> {
        self.editable(&run).await?;
        if !self.users.remove_user(run.clone()).await? {
            return Err(AdminError::UserNotFound(run));
        }
        info!("User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::domain::Discount;
    use crate::store::{keys, LocalStore};

    async fn setup() -> (UserAdmin, LocalStore) {
        let store = LocalStore::in_memory();
        let (actor, inner) = ResourceActor::<User>::new(8, store.clone());
        tokio::spawn(actor.run());
        let users = UserClient::new(inner);

        let client = User::new("12345678", "Ana", "Rojas", "ana@gmail.com");
        let mut admin = User::new("11111111", "Admin", "Junimo", "admin@duoc.cl");
        admin.user_type = UserType::Admin;
        users.reset(vec![client, admin]).await.unwrap();
        (UserAdmin::new(users), store)
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            run: "7654321".into(),
            name: "Pedro".into(),
            surnames: "Lagos".into(),
            email: "pedro@profesor.duoc.cl".into(),
            birthdate: NaiveDate::from_ymd_opt(1980, 1, 1),
            street: "Ruta".into(),
            commune: "Osorno".into(),
            region: "Región de Los Lagos".into(),
            password: "abcd".into(),
            password_confirmation: "abcd".into(),
            ..RegistrationForm::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[tokio::test]
    async fn test_admin_accounts_are_never_written() {
        let (admin, store) = setup().await;
        let before = store.load::<Vec<User>>(keys::USERS);

        let patch = UserPatch {
            name: Some("Hacker".into()),
            ..UserPatch::default()
        };
        assert_eq!(
            admin.update("11111111".into(), patch).await,
            Err(AdminError::ProtectedAdmin("11111111".into()))
        );
        assert_eq!(
            admin.delete("11111111".into()).await,
            Err(AdminError::ProtectedAdmin("11111111".into()))
        );
        assert_eq!(store.load::<Vec<User>>(keys::USERS), before);
    }

    #[tokio::test]
    async fn test_clients_can_be_updated_and_deleted() {
        let (admin, _) = setup().await;
        let patch = UserPatch {
            phone: Some(Some("9 1111 2222".into())),
            ..UserPatch::default()
        };
        let updated = admin.update("12345678".into(), patch).await.unwrap();
        assert_eq!(updated.phone.as_deref(), Some("9 1111 2222"));

        admin.delete("12345678".into()).await.unwrap();
        assert_eq!(
            admin.delete("12345678".into()).await,
            Err(AdminError::UserNotFound("12345678".into()))
        );
    }

    #[tokio::test]
    async fn test_email_change_is_checked() {
        let (admin, _) = setup().await;
        let taken = UserPatch {
            email: Some("admin@duoc.cl".into()),
            ..UserPatch::default()
        };
        assert_eq!(
            admin.update("12345678".into(), taken).await,
            Err(AdminError::DuplicateEmail("admin@duoc.cl".into()))
        );
        let foreign = UserPatch {
            email: Some("ana@yahoo.com".into()),
            ..UserPatch::default()
        };
        assert!(matches!(
            admin.update("12345678".into(), foreign).await,
            Err(AdminError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_create_uses_admin_rules_and_form_role() {
        let (admin, _) = setup().await;
        let mut new_admin = form();
        new_admin.user_type = UserType::Admin;

        let created = admin.create(new_admin.clone(), today()).await.unwrap();
        assert!(created.is_admin());
        assert_eq!(created.discount, None);

        new_admin.email = "otro@gmail.com".into();
        assert_eq!(
            admin.create(new_admin, today()).await,
            Err(AdminError::DuplicateRun("7654321".into()))
        );
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let (admin, _) = setup().await;
        let all = admin.list(&UserFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let filter = UserFilter {
            name: Some("rojas".into()),
            ..UserFilter::default()
        };
        let found = admin.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].run, "12345678");

        let admins = UserFilter {
            user_type: Some(UserType::Admin),
            ..UserFilter::default()
        };
        assert_eq!(admin.list(&admins).await.unwrap()[0].run, "11111111");
    }

    #[tokio::test]
    async fn test_stats_count_types_and_discounts() {
        let (admin, _) = setup().await;
        let mut student = form();
        student.run = "20111222".into();
        student.email = "camila@duocuc.cl".into();
        let created = admin.create(student, today()).await.unwrap();
        let patch = UserPatch {
            discount: Some(Discount::percent(15)),
            ..UserPatch::default()
        };
        admin.update(created.run, patch).await.unwrap();

        assert_eq!(
            admin.stats().await.unwrap(),
            UserStats {
                total: 3,
                clients: 2,
                admins: 1,
                with_discount: 1,
            }
        );
    }
}
