use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{User, UserType};

/// The signed-in user as persisted under the session key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The user's RUN.
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub login_time: DateTime<Utc>,
}

impl Session {
    pub fn start(user: &User, at: DateTime<Utc>) -> Self {
        Self {
            id: user.run.clone(),
            name: user.full_name(),
            email: user.email.clone(),
            user_type: user.user_type,
            login_time: at,
        }
    }
}

/// Where the storefront should navigate next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Redirect {
    AdminDashboard,
    StorefrontHome,
    Login,
}

impl Redirect {
    pub fn path(self) -> &'static str {
        match self {
            Self::AdminDashboard => "/admin/dashboard",
            Self::StorefrontHome => "/index",
            Self::Login => "/login",
        }
    }

    pub fn for_role(user_type: UserType) -> Self {
        match user_type {
            UserType::Admin => Self::AdminDashboard,
            UserType::Client => Self::StorefrontHome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub session: Session,
    pub redirect: Redirect,
}

/// Outcome of guarding an admin page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    RedirectToLogin,
    RedirectToHome,
}

impl AccessDecision {
    pub fn redirect(self) -> Option<Redirect> {
        match self {
            Self::Allowed => None,
            Self::RedirectToLogin => Some(Redirect::Login),
            Self::RedirectToHome => Some(Redirect::StorefrontHome),
        }
    }
}
