use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::entities::{logs, prelude::*};

/// Writes to the audit sink. Callers decide whether a failed write matters;
/// this repository just reports it like any other statement.
pub struct AuditRepository {
    conn: DatabaseConnection,
}

impl AuditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, sha256: Option<&str>, message: &str) -> Result<()> {
        let entry = logs::ActiveModel {
            sha256: Set(sha256.map(str::to_string)),
            exception_message: Set(message.to_string()),
            created_at: Set(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            ..Default::default()
        };

        Logs::insert(entry).exec(&self.conn).await?;
        Ok(())
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<logs::Model>> {
        let entries = Logs::find()
            .order_by_desc(logs::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(entries)
    }
}
