//! User account types

use serde::Deserialize;

use crate::plan::present;

/// Stored user account
///
/// Only the Argon2 PHC string of the password is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: String,
    pub account_name: Option<String>,
    pub email_id: String,
    pub password_hash: String,
}

/// Registration request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub account_name: Option<String>,
    pub email_id: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_id: Option<String>,
    pub password: Option<String>,
}

/// Email and password, both present and non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email_id: String,
    pub password: String,
}

impl RegistrationRequest {
    pub fn into_parts(self) -> Option<(Credentials, Option<String>)> {
        let credentials = Credentials::from_parts(self.email_id, self.password)?;
        Some((credentials, self.account_name))
    }
}

impl LoginRequest {
    pub fn credentials(self) -> Option<Credentials> {
        Credentials::from_parts(self.email_id, self.password)
    }
}

impl Credentials {
    fn from_parts(email_id: Option<String>, password: Option<String>) -> Option<Self> {
        Some(Self {
            email_id: present(email_id)?,
            password: present(password)?,
        })
    }
}
