//! Authentication service

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::sync::Arc;
use travel_core::ports::UserAccountStore;
use travel_core::{Credentials, Result, TravelError};

/// Registration and credential checks over the account store
///
/// Passwords are stored as salted Argon2id hashes and checked with
/// `verify_password`, which compares in constant time.
pub struct AuthService {
    accounts: Arc<dyn UserAccountStore>,
    // Verified against when the email is unknown, so both failure paths cost one hash
    dummy_hash: String,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn UserAccountStore>) -> Result<Self> {
        let dummy_hash = hash_password(&uuid::Uuid::new_v4().to_string())?;
        Ok(Self {
            accounts,
            dummy_hash,
        })
    }

    /// Store a new account and return its id.
    pub async fn register(
        &self,
        credentials: &Credentials,
        account_name: Option<&str>,
    ) -> Result<String> {
        if self.accounts.email_exists(&credentials.email_id).await? {
            return Err(TravelError::EmailTaken(credentials.email_id.clone()));
        }

        let password_hash = hash_password(&credentials.password)?;

        // The store rejects the insert too if another registration won the race
        self.accounts
            .create_account(&credentials.email_id, &password_hash, account_name)
            .await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<bool> {
        match self
            .accounts
            .get_account_by_email(&credentials.email_id)
            .await?
        {
            Some(account) => verify_password(&credentials.password, &account.password_hash),
            None => {
                verify_password(&credentials.password, &self.dummy_hash)?;
                Ok(false)
            }
        }
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TravelError::PasswordHash(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| TravelError::PasswordHash(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email_id: "grace@example.com".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone()).unwrap();

        auth.register(&credentials("correct horse"), Some("Grace"))
            .await
            .unwrap();

        assert!(auth.login(&credentials("correct horse")).await.unwrap());
        assert!(!auth.login(&credentials("battery staple")).await.unwrap());

        let unknown = Credentials {
            email_id: "nobody@example.com".to_string(),
            password: "correct horse".to_string(),
        };
        assert!(!auth.login(&unknown).await.unwrap());
    }

    #[tokio::test]
    async fn test_password_is_not_stored_in_plaintext() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone()).unwrap();
        auth.register(&credentials("correct horse"), None).await.unwrap();

        let account = store
            .get_account_by_email("grace@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(account.password_hash.starts_with("$argon2id$"));
        assert!(!account.password_hash.contains("correct horse"));
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let auth = AuthService::new(Arc::new(MemoryStore::new())).unwrap();
        auth.register(&credentials("one"), None).await.unwrap();

        let err = auth.register(&credentials("two"), None).await.unwrap_err();
        assert!(matches!(err, TravelError::EmailTaken(_)));
    }
}
