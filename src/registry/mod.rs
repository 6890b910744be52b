//! Collaborators the update check reads from.
//!
//! The service only sees these traits. `GlotPressDb` (see `crate::db`) reads a
//! live GlotPress database; `StaticRegistry` holds everything in memory and can
//! be loaded from a JSON file.

mod memory;

pub use memory::StaticRegistry;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A translatable unit of software (plugin, theme or core).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    /// Canonical slash-delimited path, without leading or trailing slashes
    pub path: String,
}

/// All translated strings of one project in one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSet {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    pub slug: String,
    /// Short locale code the set is stored under (e.g. "pl")
    pub locale: String,
}

/// Project and translation-set lookup.
#[async_trait]
pub trait ProjectRegistry: Send + Sync {
    /// Find a project by its canonical path.
    async fn find_project_by_path(&self, path: &str) -> Result<Option<Project>>;

    /// All translation sets belonging to a project.
    async fn translation_sets_for_project(&self, project_id: u64) -> Result<Vec<TranslationSet>>;
}

/// Last-modified timestamps of translation sets.
#[async_trait]
pub trait FreshnessProvider: Send + Sync {
    /// Timestamp of the most recent current translation in the set, or
    /// `None` if the set has none.
    async fn last_modified(&self, set: &TranslationSet) -> Result<Option<String>>;
}
