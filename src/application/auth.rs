//! Single-admin authentication.
//!
//! Every protected request presents a username and secret which are checked
//! against the stored administrator record. The configured credential only seeds
//! that record; once it exists, the store is authoritative.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::repos::{AdminsRepo, CreateAdminParams, RepoError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Auth required")]
    Missing,
    #[error("Invalid credentials")]
    Invalid,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both parts must be present and non-empty.
    pub fn from_parts(username: Option<&str>, password: Option<&str>) -> Result<Self, AuthError> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Self {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            _ => Err(AuthError::Missing),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminPrincipal {
    pub id: Uuid,
    pub username: String,
}

/// Decides whether a credential pair identifies the administrator.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> Result<AdminPrincipal, AuthError>;
}

/// Verifies against the stored admin record by SHA-256 digest.
#[derive(Clone)]
pub struct StoredAdminVerifier {
    repo: Arc<dyn AdminsRepo>,
}

impl StoredAdminVerifier {
    pub fn new(repo: Arc<dyn AdminsRepo>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CredentialVerifier for StoredAdminVerifier {
    async fn verify(&self, credentials: &Credentials) -> Result<AdminPrincipal, AuthError> {
        let record = self
            .repo
            .find_admin(&credentials.username)
            .await?
            .ok_or(AuthError::Invalid)?;

        let hashed_input = hash_secret(&credentials.password);
        if record.password_hash.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(AuthError::Invalid);
        }

        Ok(AdminPrincipal {
            id: record.id,
            username: record.username,
        })
    }
}

pub fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub username: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_login: OffsetDateTime,
}

#[derive(Clone)]
pub struct AdminAuthService {
    verifier: Arc<dyn CredentialVerifier>,
    repo: Arc<dyn AdminsRepo>,
    seed: Credentials,
}

impl AdminAuthService {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        repo: Arc<dyn AdminsRepo>,
        seed: Credentials,
    ) -> Self {
        Self {
            verifier,
            repo,
            seed,
        }
    }

    /// Create the administrator from the seed credential when none exists yet.
    pub async fn ensure_seed_admin(&self) -> Result<bool, AuthError> {
        if self.repo.count_admins().await? > 0 {
            return Ok(false);
        }

        let result = self
            .repo
            .create_admin(CreateAdminParams {
                username: self.seed.username.clone(),
                password_hash: hash_secret(&self.seed.password),
            })
            .await;

        match result {
            Ok(record) => {
                info!(
                    target = "storefront::auth",
                    username = %record.username,
                    "Seeded administrator account"
                );
                Ok(true)
            }
            // Another instance seeded concurrently.
            Err(RepoError::Duplicate { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Gate check for protected requests.
    pub async fn authenticate(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<AdminPrincipal, AuthError> {
        let credentials = Credentials::from_parts(username, password)?;
        self.verifier.verify(&credentials).await
    }

    /// Best-effort `last_login` refresh after a successful gate check.
    pub fn record_activity(&self, principal: &AdminPrincipal) {
        let repo = self.repo.clone();
        let id = principal.id;
        tokio::spawn(async move {
            if let Err(err) = repo.record_login(id, OffsetDateTime::now_utc()).await {
                warn!(
                    target = "storefront::auth",
                    admin_id = %id,
                    error = %err,
                    "Failed to record admin activity"
                );
            }
        });
    }

    /// Validate the pair and stamp the administrator's last login time.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginOutcome, AuthError> {
        let credentials = Credentials::from_parts(username, password)?;

        if credentials == self.seed {
            self.ensure_seed_admin().await?;
        }

        let principal = match self.verifier.verify(&credentials).await {
            Ok(principal) => principal,
            Err(err) => {
                warn!(
                    target = "storefront::auth",
                    username = %credentials.username,
                    "Rejected admin login"
                );
                return Err(err);
            }
        };

        let now = OffsetDateTime::now_utc();
        self.repo.record_login(principal.id, now).await?;

        Ok(LoginOutcome {
            username: principal.username,
            last_login: now,
        })
    }
}
