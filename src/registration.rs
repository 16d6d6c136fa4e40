//! Self-service account creation.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::clients::UserClient;
use crate::domain::{Discount, User, UserType};
use crate::user_actor::UserError;
use crate::validation::{self, Flow, RegistrationForm, ValidationReport};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistrationError {
    #[error("Registration form has {} invalid field(s)", .0.errors.len())]
    Invalid(ValidationReport),
    #[error("Este RUN ya está registrado")]
    DuplicateRun(String),
    #[error("Este email ya está registrado")]
    DuplicateEmail(String),
    #[error("User repository error: {0}")]
    Repository(#[from] UserError),
}

/// Builds the stored record for a validated form.
pub(crate) fn user_from_form(form: &RegistrationForm, user_type: UserType, discount: Option<Discount>) -> User {
    let mut user = User::new(
        form.run.trim(),
        form.name.trim(),
        form.surnames.trim(),
        form.email.trim(),
    );
    user.phone = Some(validation::format_phone(&form.phone)).filter(|phone| !phone.is_empty());
    user.address = form.address();
    user.birthdate = form.birthdate;
    user.user_type = user_type;
    user.password = form.password.clone();
    user.discount = discount;
    user
}

#[derive(Clone)]
pub struct RegistrationService {
    users: UserClient,
    academic_discount: Discount,
}

impl RegistrationService {
    pub fn new(users: UserClient, academic_discount: Discount) -> Self {
        Self {
            users,
            academic_discount,
        }
    }

    /// Validates the form, rejects a taken RUN or email, then stores a new
    /// client account. Academic emails get the discount tag.
    #[instrument(skip(self, form), fields(run = %form.run))]
    pub async fn register(&self, form: RegistrationForm, today: NaiveDate) -> Result<User, RegistrationError> {
        let report = validation::validate_all(&form, Flow::SelfRegistration, today);
        if !report.valid {
            info!(fields = report.errors.len(), "Registration form rejected");
            return Err(RegistrationError::Invalid(report));
        }

        let run = form.run.trim().to_string();
        if self.users.get_user(run.clone()).await?.is_some() {
            warn!("RUN already registered");
            return Err(RegistrationError::DuplicateRun(run));
        }
        if self.users.email_in_use(form.email.clone()).await? {
            warn!("Email already registered");
            return Err(RegistrationError::DuplicateEmail(form.email.trim().to_string()));
        }

        let discount = (validation::is_academic_email(&form.email) && !self.academic_discount.is_zero())
            .then_some(self.academic_discount);
        let user = user_from_form(&form, UserType::Client, discount);

        match self.users.add_user(user).await {
            Ok(stored) => {
                info!(discount = ?stored.discount, "User registered");
                Ok(stored)
            }
            Err(UserError::AlreadyExists(run)) => Err(RegistrationError::DuplicateRun(run)),
            Err(e) => Err(e.into()),
        }
    }
}
