use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::empty_as_none;

/// Account role. Admin accounts are read-only from admin user management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    Client,
    Admin,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "Client"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// Percentage discount tag, stored as text such as `"20%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Discount(u8);

impl Discount {
    pub const NONE: Self = Self(0);

    /// Builds a tag from a whole percentage in `0..=100`.
    pub fn percent(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    pub fn as_percent(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Discount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_end_matches('%').trim();
        let value: u8 = digits
            .parse()
            .map_err(|_| format!("invalid discount tag: {s}"))?;
        Self::percent(value).ok_or_else(|| format!("discount out of range: {s}"))
    }
}

impl TryFrom<String> for Discount {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Discount> for String {
    fn from(value: Discount) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub commune: String,
    #[serde(default)]
    pub region: String,
}

/// A registered account, keyed by `run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub run: String,
    pub name: String,
    #[serde(default)]
    pub surnames: String,
    pub email: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default, alias = "type")]
    pub user_type: UserType,
    /// Stored and compared verbatim.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub discount: Option<Discount>,
}

impl User {
    pub fn new(
        run: impl Into<String>,
        name: impl Into<String>,
        surnames: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            run: run.into(),
            name: name.into(),
            surnames: surnames.into(),
            email: email.into(),
            phone: None,
            address: Address::default(),
            birthdate: None,
            user_type: UserType::Client,
            password: String::new(),
            discount: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn full_name(&self) -> String {
        if self.surnames.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.surnames)
        }
    }
}

/// Partial update for a user. The RUN is the natural key and never changes.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub surnames: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the phone.
    pub phone: Option<Option<String>>,
    pub address: Option<Address>,
    pub birthdate: Option<NaiveDate>,
    pub user_type: Option<UserType>,
    pub password: Option<String>,
    pub discount: Option<Option<Discount>>,
}
