use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::clients::randomuser::RandomUserClient;
use crate::db::Store;
use crate::models::user::UserRecord;
use crate::services::users::UserService;

#[derive(Debug, Default, Clone, Copy)]
pub struct IngestStats {
    pub fetched: usize,
    pub inserted: usize,
    pub failed: usize,
}

/// One-shot batch import from the random-user generator service.
pub struct IngestService {
    users: UserService,
    client: RandomUserClient,
}

impl IngestService {
    #[must_use]
    pub const fn new(store: Store, client: RandomUserClient) -> Self {
        Self {
            users: UserService::new(store),
            client,
        }
    }

    /// Fetches one batch and feeds it through the create path. The fetch
    /// failing fails the whole job; a failing record only costs that record.
    /// Re-running imports a fresh batch under new uuids; nothing is
    /// deduplicated against existing rows.
    pub async fn run(&self, count: u32) -> Result<IngestStats> {
        let batch = self
            .client
            .fetch(count)
            .await
            .context("upstream fetch failed")?;

        info!(
            "fetched {} records (seed: {}, version: {})",
            batch.results.len(),
            batch.info.seed.as_deref().unwrap_or("?"),
            batch.info.version.as_deref().unwrap_or("?"),
        );

        Ok(self.ingest_records(batch.results).await)
    }

    pub async fn ingest_records(&self, records: Vec<UserRecord>) -> IngestStats {
        let mut stats = IngestStats {
            fetched: records.len(),
            ..IngestStats::default()
        };

        for record in records {
            let email = record.email.clone();
            match self.users.create(record).await {
                Ok(_) => stats.inserted += 1,
                Err(err) => {
                    stats.failed += 1;
                    warn!("skipping record ({email}): {err}");
                }
            }
        }

        stats
    }
}
