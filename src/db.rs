//! GlotPress MySQL backend for project and freshness lookups.

use crate::registry::{FreshnessProvider, Project, ProjectRegistry, TranslationSet};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

/// Format of `last_modified` values, matching GlotPress' MySQL datetimes
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: u64,
    name: String,
    path: String,
}

#[derive(Debug, sqlx::FromRow)]
struct TranslationSetRow {
    id: u64,
    project_id: u64,
    name: String,
    slug: String,
    locale: String,
}

/// Read-only access to a GlotPress database.
#[derive(Clone)]
pub struct GlotPressDb {
    pool: MySqlPool,
    queries: Queries,
}

/// SQL for a given table prefix. Table names cannot be bound as parameters,
/// so the prefix is validated before it is interpolated.
#[derive(Debug, Clone)]
struct Queries {
    project_by_path: String,
    sets_by_project: String,
    last_modified: String,
}

impl Queries {
    fn new(prefix: &str) -> Result<Self> {
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            bail!("Invalid table prefix: '{}'", prefix);
        }

        Ok(Self {
            project_by_path: format!(
                "SELECT CAST(id AS UNSIGNED) AS id, name, path \
                 FROM {prefix}projects WHERE path = ? LIMIT 1"
            ),
            sets_by_project: format!(
                "SELECT CAST(id AS UNSIGNED) AS id, CAST(project_id AS UNSIGNED) AS project_id, \
                 name, slug, locale \
                 FROM {prefix}translation_sets WHERE project_id = ? ORDER BY id"
            ),
            last_modified: format!(
                "SELECT date_modified FROM {prefix}translations \
                 WHERE translation_set_id = ? AND status = 'current' \
                 ORDER BY date_modified DESC LIMIT 1"
            ),
        })
    }
}

impl GlotPressDb {
    /// Connect to the GlotPress database
    pub async fn connect(database_url: &str, table_prefix: &str) -> Result<Self> {
        let queries = Queries::new(table_prefix)?;

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("Failed to connect to GlotPress database")?;

        info!("✓ Connected to GlotPress database (table prefix '{}')", table_prefix);

        Ok(Self { pool, queries })
    }
}

#[async_trait]
impl ProjectRegistry for GlotPressDb {
    async fn find_project_by_path(&self, path: &str) -> Result<Option<Project>> {
        let row: Option<ProjectRow> = sqlx::query_as(&self.queries.project_by_path)
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to look up project '{}'", path))?;

        Ok(row.map(|row| Project {
            id: row.id,
            name: row.name,
            path: row.path,
        }))
    }

    async fn translation_sets_for_project(&self, project_id: u64) -> Result<Vec<TranslationSet>> {
        let rows: Vec<TranslationSetRow> = sqlx::query_as(&self.queries.sets_by_project)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Failed to load translation sets of project {}", project_id))?;

        Ok(rows
            .into_iter()
            .map(|row| TranslationSet {
                id: row.id,
                project_id: row.project_id,
                name: row.name,
                slug: row.slug,
                locale: row.locale,
            })
            .collect())
    }
}

#[async_trait]
impl FreshnessProvider for GlotPressDb {
    async fn last_modified(&self, set: &TranslationSet) -> Result<Option<String>> {
        let modified: Option<Option<NaiveDateTime>> = sqlx::query_scalar(&self.queries.last_modified)
            .bind(set.id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read last modification of set {}", set.id))?;

        Ok(modified
            .flatten()
            .map(|dt| dt.format(TIMESTAMP_FORMAT).to_string()))
    }
}
