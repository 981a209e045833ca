//! Picks the active store once per session and migrates on-device data on first sign-in.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::NewExpense;

use super::{ExpenseRepository, Result};

/// Records per bulk write during migration.
pub const MIGRATION_BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current-user signal; `None` means nobody is signed in.
pub type Identity = Option<UserId>;

/// The repository chosen for the lifetime of a session.
pub struct Session {
    identity: Identity,
    repository: Arc<dyn ExpenseRepository>,
}

impl Session {
    /// Uses the per-user store when signed in, the on-device store otherwise.
    pub fn open<F>(identity: Identity, local: Arc<dyn ExpenseRepository>, per_user: F) -> Result<Self>
    where
        F: FnOnce(&UserId) -> Result<Arc<dyn ExpenseRepository>>,
    {
        let repository = match identity.as_ref() {
            Some(user) => {
                info!(user = %user, "session opened against per-user store");
                per_user(user)?
            }
            None => {
                info!("session opened against on-device store");
                local
            }
        };
        Ok(Self {
            identity,
            repository,
        })
    }

    pub fn identity(&self) -> Option<&UserId> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn repository(&self) -> &dyn ExpenseRepository {
        self.repository.as_ref()
    }

    pub fn shared_repository(&self) -> Arc<dyn ExpenseRepository> {
        Arc::clone(&self.repository)
    }
}

/// Copies every on-device record into `remote` and empties `local`.
///
/// Ids are reassigned by `remote`. Returns the number of migrated records; an
/// empty local store is a no-op. If any batch fails, `local` is left intact.
pub fn migrate_local_to_user(
    local: &dyn ExpenseRepository,
    remote: &dyn ExpenseRepository,
) -> Result<usize> {
    let records: Vec<NewExpense> = local.fetch_all()?.iter().map(|e| e.to_new()).collect();
    if records.is_empty() {
        return Ok(0);
    }
    let total = records.len();
    for chunk in records.chunks(MIGRATION_BATCH_SIZE) {
        remote.insert_many(chunk.to_vec())?;
    }
    local.clear_all()?;
    info!(migrated = total, "on-device expenses migrated to per-user store");
    Ok(total)
}
