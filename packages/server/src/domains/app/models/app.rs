use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::AppId;

/// An installed integration. Tax apps are matched against a channel's
/// configured tax app by `identifier`, not by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub identifier: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl App {
    /// Batch-load apps by ID (for DataLoader)
    pub async fn find_by_ids(ids: &[AppId], pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT id, name, identifier, is_active, created_at
            FROM apps
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// True when this app answers to the given tax app identifier.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.identifier.as_deref() == Some(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(identifier: Option<&str>) -> App {
        App {
            id: AppId::new(1),
            name: "Avalara".to_string(),
            identifier: identifier.map(str::to_string),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_identifier() {
        assert!(app(Some("app.avalara")).matches_identifier("app.avalara"));
        assert!(!app(Some("app.avalara")).matches_identifier("app.taxjar"));
        assert!(!app(None).matches_identifier("app.avalara"));
    }
}
