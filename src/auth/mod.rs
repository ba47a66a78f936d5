//! Authentication: password hashing, signed tokens and the request gate.

pub mod extractor;
pub mod password;
pub mod token;

pub use extractor::{AdminUser, AuthenticatedUser};
pub use password::PasswordHasher;
pub use token::{TokenClaims, TokenService};

use crate::models::User;
use crate::services::{StoreError, UserStore};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves Basic credentials to a user
///
/// The identifier is tried as a token first and as a username second, so
/// a client holding a token sends it as the Basic user name with any
/// password.
pub struct Authenticator {
    users: Arc<UserStore>,
    tokens: TokenService,
    passwords: PasswordHasher,
    admin_usernames: Vec<String>,
    /// Verified against when the username is unknown, so both paths cost one argon2 check
    dummy_hash: Option<String>,
}

impl Authenticator {
    pub fn new(users: Arc<UserStore>, tokens: TokenService, admin_usernames: Vec<String>) -> Self {
        let passwords = PasswordHasher::new();
        let dummy_hash = passwords.hash("crime-stats-unknown-user").ok();

        Self {
            users,
            tokens,
            passwords,
            admin_usernames,
            dummy_hash,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn passwords(&self) -> &PasswordHasher {
        &self.passwords
    }

    pub fn is_admin(&self, user: &User) -> bool {
        self.is_reserved(&user.username)
    }

    /// Admin names can only be created by [`Authenticator::provision_admins`]
    pub fn is_reserved(&self, username: &str) -> bool {
        self.admin_usernames.iter().any(|name| name == username)
    }

    /// Create each configured admin account that does not exist yet
    ///
    /// Existing accounts keep their password. Returns the names created.
    pub async fn provision_admins(&self, password: &str) -> Result<Vec<String>, AuthError> {
        let mut created = Vec::new();

        for name in &self.admin_usernames {
            if self.users.find_by_username(name).await?.is_some() {
                continue;
            }
            let hash = self.passwords.hash(password)?;
            self.users.create_user(name, &hash).await?;
            created.push(name.clone());
        }

        Ok(created)
    }

    pub async fn authenticate(
        &self,
        identifier: &str,
        password: Option<&str>,
    ) -> Result<User, AuthError> {
        match self.tokens.verify(identifier) {
            Ok(claims) => {
                if let Some(user) = self.users.find_by_id(claims.id).await? {
                    return Ok(user);
                }
                tracing::debug!("Token for unknown user id {}", claims.id);
            }
            Err(AuthError::TokenExpired) => {
                tracing::debug!("Rejected expired token");
            }
            Err(_) => {}
        }

        let Some(user) = self.users.find_by_username(identifier).await? else {
            if let Some(dummy) = &self.dummy_hash {
                let _ = self.passwords.verify(password.unwrap_or_default(), dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        let verified = self
            .passwords
            .verify(password.unwrap_or_default(), &user.password_hash)?;
        if verified && password.is_some() {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn authenticator() -> (Authenticator, User) {
        let users = Arc::new(UserStore::in_memory().await.unwrap());
        let passwords = PasswordHasher::new();
        let user = users
            .create_user("alice", &passwords.hash("wonderland").unwrap())
            .await
            .unwrap();

        let auth = Authenticator::new(users, TokenService::new("secret", 600), vec!["root".into()]);
        (auth, user)
    }

    #[tokio::test]
    async fn test_password_path() {
        let (auth, user) = authenticator().await;

        assert_eq!(auth.authenticate("alice", Some("wonderland")).await.unwrap(), user);
        assert!(matches!(
            auth.authenticate("alice", Some("nope")).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("alice", None).await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("nobody", Some("wonderland")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_token_path() {
        let (auth, user) = authenticator().await;
        let token = auth.tokens().issue(user.id).unwrap();

        assert_eq!(auth.authenticate(&token, None).await.unwrap(), user);
    }

    #[tokio::test]
    async fn test_expired_token_falls_through_and_fails() {
        let (auth, user) = authenticator().await;
        let stale = auth
            .tokens()
            .issue_at(user.id, chrono::Utc::now().timestamp() - 600)
            .unwrap();

        assert!(matches!(
            auth.authenticate(&stale, Some("wonderland")).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_pays_for_a_hash_check() {
        let (auth, _) = authenticator().await;

        let dummy = auth.dummy_hash.as_deref().unwrap();
        assert!(!auth.passwords().verify("wonderland", dummy).unwrap());
        assert!(matches!(
            auth.authenticate("nobody", None).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_provision_admins_creates_missing_only() {
        let users = Arc::new(UserStore::in_memory().await.unwrap());
        let auth = Authenticator::new(
            users.clone(),
            TokenService::new("secret", 600),
            vec!["root".into(), "ops".into()],
        );
        assert!(auth.is_reserved("root"));
        assert!(!auth.is_reserved("alice"));

        let created = auth.provision_admins("toor").await.unwrap();
        assert_eq!(created, vec!["root".to_string(), "ops".to_string()]);
        assert!(auth.provision_admins("other").await.unwrap().is_empty());

        let root = auth.authenticate("root", Some("toor")).await.unwrap();
        assert!(auth.is_admin(&root));
        assert!(auth.authenticate("root", Some("other")).await.is_err());
    }

    #[tokio::test]
    async fn test_admin_role() {
        let (auth, user) = authenticator().await;
        assert!(!auth.is_admin(&user));

        let root = User {
            id: 99,
            username: "root".into(),
            password_hash: String::new(),
        };
        assert!(auth.is_admin(&root));
    }
}
