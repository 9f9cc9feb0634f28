use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;

use crate::db::Store;
use crate::db::query::UserFilter;
use crate::models::user::{NewUser, UserRecord, UserUpdate};

/// Domain errors for user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(String),
}

/// CRUD orchestration over the store. Validation happens here, before any
/// statement runs; store failures are audited best-effort on the way out.
#[derive(Clone)]
pub struct UserService {
    store: Store,
}

impl UserService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Filtered listing in database order. Callers must not rely on any
    /// particular ordering.
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<UserRecord>, UserError> {
        match self.store.list_users(filter).await {
            Ok(records) => Ok(records),
            Err(err) => Err(self.store_failure(None, &err).await),
        }
    }

    pub async fn get(&self, uuid: &str) -> Result<UserRecord, UserError> {
        match self.store.get_user(uuid).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(UserError::NotFound(uuid.to_string())),
            Err(err) => Err(self.store_failure(None, &err).await),
        }
    }

    /// Full-record creation. Accepts any record as-is; a blank login uuid
    /// gets a fresh v4. Returns the uuid the record is stored under.
    pub async fn create(&self, mut record: UserRecord) -> Result<String, UserError> {
        if record.login.uuid.trim().is_empty() {
            record.login.uuid = Uuid::new_v4().to_string();
        }

        let sha256 = known_sha256(&record);
        match self.store.insert_user(&record).await {
            Ok(()) => Ok(record.login.uuid),
            Err(err) => Err(self.store_failure(sha256.as_deref(), &err).await),
        }
    }

    /// Lightweight creation path. Requires the handful of fields the
    /// front-end form collects; everything else starts at its zero value.
    pub async fn add(&self, payload: NewUser) -> Result<String, UserError> {
        require_non_empty("gender", &payload.gender)?;
        require_non_empty("name.first", &payload.name.first)?;
        require_non_empty("name.last", &payload.name.last)?;
        require_non_empty("email", &payload.email)?;
        require_non_empty("phone", &payload.phone)?;

        self.create(payload.into_record()).await
    }

    pub async fn update(&self, uuid: &str, changes: &UserUpdate) -> Result<(), UserError> {
        require_non_empty("gender", &changes.gender)?;
        require_non_empty("name.first", &changes.name.first)?;
        require_non_empty("name.last", &changes.name.last)?;
        require_non_empty("email", &changes.email)?;
        require_non_empty("phone", &changes.phone)?;

        match self.store.update_user(uuid, changes).await {
            Ok(0) => Err(UserError::NotFound(uuid.to_string())),
            Ok(_) => Ok(()),
            Err(err) => Err(self.store_failure(None, &err).await),
        }
    }

    pub async fn delete(&self, uuid: &str) -> Result<(), UserError> {
        match self.store.delete_user(uuid).await {
            Ok(0) => Err(UserError::NotFound(uuid.to_string())),
            Ok(_) => Ok(()),
            Err(err) => Err(self.store_failure(None, &err).await),
        }
    }

    /// Turns a store failure into the caller-facing error after one
    /// best-effort audit write. A failed audit write is swallowed so it can
    /// never replace the primary failure.
    async fn store_failure(&self, sha256: Option<&str>, err: &anyhow::Error) -> UserError {
        error!("store operation failed: {err:#}");

        if let Err(audit_err) = self.store.record_failure(sha256, &err.to_string()).await {
            debug!("audit sink write failed: {audit_err}");
        }

        UserError::Database(err.to_string())
    }
}

fn known_sha256(record: &UserRecord) -> Option<String> {
    let sha = record.login.sha256.trim();
    (!sha.is_empty()).then(|| sha.to_string())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), UserError> {
    if value.trim().is_empty() {
        return Err(UserError::Validation(format!("{field} is required")));
    }
    Ok(())
}
