use std::sync::Arc;

use crate::dto::auth_dto::RegisterPayload;
use crate::error::{Error, Result};
use crate::models::user::{Role, User};
use crate::store::{TableStore, USERS_TABLE};
use crate::utils::crypto;
use crate::utils::time::sheet_timestamp;

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn TableStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<User> {
        if payload.password != payload.confirm_password {
            return Err(Error::BadRequest("passwords do not match".to_string()));
        }
        let username = payload.username.trim().to_string();
        if self.find_user(&username).await?.is_some() {
            return Err(Error::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }
        let hashed = crypto::hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;
        let user = User {
            username,
            password: hashed,
            fullname: payload.fullname.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            role: Role::User,
            created_at: sheet_timestamp(),
        };
        self.store.append_row(USERS_TABLE, user.to_row()).await?;
        tracing::info!(username = %user.username, "user registered");
        Ok(user)
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<User>> {
        let wanted = username.trim();
        let records = self.store.read_table(USERS_TABLE).await?;
        Ok(records
            .iter()
            .map(User::from_record)
            .find(|user| user.username == wanted))
    }

    /// One failure message for unknown users and wrong passwords.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User> {
        let invalid = || Error::Unauthorized("invalid username or password".to_string());
        let user = self.find_user(username).await?.ok_or_else(invalid)?;

        if user.password.starts_with("$argon2") {
            match crypto::verify_password(password, &user.password) {
                Ok(true) => {}
                Ok(false) => return Err(invalid()),
                Err(err) => {
                    tracing::error!(
                        error = %err,
                        username = %user.username,
                        "stored credential hash unreadable"
                    );
                    return Err(invalid());
                }
            }
        } else {
            // Rows imported before hashing hold the raw password.
            if !crypto::constant_time_eq(password, &user.password) {
                return Err(invalid());
            }
            tracing::warn!(username = %user.username, "plaintext credential row matched");
        }
        Ok(user)
    }

    /// Creates the configured admin account unless it already exists.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<()> {
        if self.find_user(username).await?.is_some() {
            return Ok(());
        }
        let hashed = crypto::hash_password(password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;
        let user = User {
            username: username.trim().to_string(),
            password: hashed,
            fullname: "Administrator".to_string(),
            phone: String::new(),
            role: Role::Admin,
            created_at: sheet_timestamp(),
        };
        self.store.append_row(USERS_TABLE, user.to_row()).await?;
        tracing::info!(username, "admin account seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn payload(username: &str) -> RegisterPayload {
        RegisterPayload {
            username: username.to_string(),
            password: "pw1234".to_string(),
            confirm_password: "pw1234".to_string(),
            fullname: "Alice Nguyen".to_string(),
            phone: "0900000001".to_string(),
        }
    }

    async fn service() -> AuthService {
        let store = MemoryStore::new();
        store.seed("USERS", &User::HEADER, vec![]).await;
        AuthService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn register_hashes_and_login_verifies() {
        let svc = service().await;
        let user = svc.register(&payload(" alice ")).await.expect("register");
        assert_eq!(user.username, "alice");
        assert!(user.password.starts_with("$argon2"));

        let verified = svc
            .verify_credentials("alice", "pw1234")
            .await
            .expect("login");
        assert_eq!(verified.role, Role::User);

        let err = svc.verify_credentials("alice", "pw9999").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_user_gets_the_same_message_as_bad_password() {
        let svc = service().await;
        svc.register(&payload("alice")).await.expect("register");

        let missing = svc.verify_credentials("nobody", "pw1234").await.unwrap_err();
        let wrong = svc.verify_credentials("alice", "wrong1").await.unwrap_err();
        assert_eq!(missing.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let svc = service().await;
        svc.register(&payload("alice")).await.expect("register");
        let err = svc.register(&payload("alice")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn mismatched_confirmation_is_rejected() {
        let svc = service().await;
        let mut bad = payload("alice");
        bad.confirm_password = "pw0000".to_string();
        let err = svc.register(&bad).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn legacy_plaintext_rows_still_log_in() {
        let store = MemoryStore::new();
        store
            .seed(
                "USERS",
                &User::HEADER,
                vec![vec![
                    "legacy",
                    "oldpass",
                    "Legacy User",
                    "0900000002",
                    "user",
                    "2024-05-01 08:00:00",
                ]],
            )
            .await;
        let svc = AuthService::new(Arc::new(store));

        assert!(svc.verify_credentials("legacy", "oldpass").await.is_ok());
        let err = svc.verify_credentials("legacy", "OLDPASS").await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[tokio::test]
    async fn seed_admin_is_idempotent() {
        let svc = service().await;
        svc.seed_admin("quizadmin", "admin123").await.expect("seed");
        svc.seed_admin("quizadmin", "admin123").await.expect("seed again");

        let admin = svc
            .verify_credentials("quizadmin", "admin123")
            .await
            .expect("login");
        assert_eq!(admin.role, Role::Admin);
    }
}
