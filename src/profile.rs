//! Profile edits made by the signed-in account on itself.
//!
//! Clients and administrators both go through here. Only the contact fields
//! shown on the profile page can change; role, password and discount stay
//! with the admin tools.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::auth::AuthService;
use crate::clients::UserClient;
use crate::domain::{User, UserPatch};
use crate::user_actor::UserError;
use crate::validation::{self, Field, ValidationReport};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProfileError {
    #[error("Debes iniciar sesión para editar tu perfil")]
    NotAuthenticated,
    #[error("No account found for RUN {0}")]
    UnknownUser(String),
    #[error("Profile has {} invalid field(s)", .0.errors.len())]
    Invalid(ValidationReport),
    #[error("Este email ya está registrado")]
    DuplicateEmail(String),
    #[error("User repository error: {0}")]
    Repository(#[from] UserError),
}

/// Fields left as `None` are not touched. An empty phone clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub surnames: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> ValidationReport {
        let checks = [
            (Field::Name, self.name.as_deref().and_then(validation::validate_name)),
            (Field::Surnames, self.surnames.as_deref().and_then(validation::validate_surname)),
            (Field::Email, self.email.as_deref().and_then(validation::validate_email)),
            (Field::Phone, self.phone.as_deref().and_then(validation::validate_phone)),
        ];
        let errors: BTreeMap<Field, String> = checks
            .into_iter()
            .filter_map(|(field, message)| message.map(|m| (field, m)))
            .collect();
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name.map(|name| name.trim().to_string()),
            surnames: self.surnames.map(|surnames| surnames.trim().to_string()),
            email: self.email.map(|email| email.trim().to_string()),
            phone: self
                .phone
                .map(|phone| Some(validation::format_phone(&phone)).filter(|p| !p.is_empty())),
            ..UserPatch::default()
        }
    }
}

#[derive(Clone)]
pub struct ProfileService {
    auth: AuthService,
    users: UserClient,
}

impl ProfileService {
    pub fn new(auth: AuthService, users: UserClient) -> Self {
        Self { auth, users }
    }

    /// The stored record of the signed-in account.
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<User, ProfileError> {
        let session = self.auth.current_user().ok_or(ProfileError::NotAuthenticated)?;
        self.users
            .get_user(session.id.clone())
            .await?
            .ok_or(ProfileError::UnknownUser(session.id))
    }

    /// Validates and applies `update` to the signed-in account, then
    /// refreshes the session so the new name and email show up at once.
    #[instrument(skip(self, update))]
    pub async fn update_own(&self, update: ProfileUpdate) -> Result<User, ProfileError> {
        let session = self.auth.current_user().ok_or(ProfileError::NotAuthenticated)?;
        let run = session.id;

        let report = update.validate();
        if !report.valid {
            info!(%run, fields = report.errors.len(), "Profile edit rejected");
            return Err(ProfileError::Invalid(report));
        }
        if let Some(email) = &update.email {
            if let Some(owner) = self.users.find_by_email(email.clone()).await? {
                if owner.run != run {
                    return Err(ProfileError::DuplicateEmail(email.trim().to_string()));
                }
            }
        }

        let updated = self
            .users
            .update_user(run.clone(), update.into_patch())
            .await?
            .ok_or_else(|| ProfileError::UnknownUser(run.clone()))?;
        if !self.auth.refresh_session(&updated) {
            warn!(%run, "Profile saved but the session still shows the old details");
        }
        info!(%run, "Profile updated");
        Ok(updated)
    }
}
