//! In-memory registry, loadable from a JSON file.

use super::{FreshnessProvider, Project, ProjectRegistry, TranslationSet};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// In-memory project registry and freshness provider.
///
/// The JSON form used by `from_json`/`from_file`:
///
/// ```json
/// {
///   "projects": [
///     {
///       "path": "my-plugin",
///       "name": "My Plugin",
///       "translation_sets": [
///         { "locale": "pl", "slug": "default", "last_modified": "2025-04-01 00:00:00" }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    projects: Vec<Project>,
    sets: Vec<TranslationSet>,
    last_modified: HashMap<u64, String>,
    next_id: u64,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    path: String,
    name: Option<String>,
    #[serde(default)]
    translation_sets: Vec<SetEntry>,
}

#[derive(Debug, Deserialize)]
struct SetEntry {
    locale: String,
    #[serde(default = "default_slug")]
    slug: String,
    name: Option<String>,
    last_modified: Option<String>,
}

fn default_slug() -> String {
    "default".to_string()
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from its JSON description.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RegistryFile =
            serde_json::from_str(json).context("Failed to parse registry JSON")?;

        let mut registry = Self::new();
        for entry in file.projects {
            let project = registry.add_project(&entry.path, entry.name.as_deref());
            for set in entry.translation_sets {
                registry.add_translation_set(
                    &project,
                    &set.locale,
                    &set.slug,
                    set.name.as_deref(),
                    set.last_modified.as_deref(),
                );
            }
        }

        Ok(registry)
    }

    /// Load a registry from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Register a project. Leading and trailing slashes of `path` are dropped.
    pub fn add_project(&mut self, path: &str, name: Option<&str>) -> Project {
        let path = path.trim_matches('/').to_string();
        let project = Project {
            id: self.allocate_id(),
            name: name.map(str::to_string).unwrap_or_else(|| path.clone()),
            path,
        };
        self.projects.push(project.clone());
        project
    }

    /// Register a translation set for `project`.
    pub fn add_translation_set(
        &mut self,
        project: &Project,
        locale: &str,
        slug: &str,
        name: Option<&str>,
        last_modified: Option<&str>,
    ) -> TranslationSet {
        let set = TranslationSet {
            id: self.allocate_id(),
            project_id: project.id,
            name: name.unwrap_or(locale).to_string(),
            slug: slug.to_string(),
            locale: locale.to_string(),
        };
        if let Some(timestamp) = last_modified {
            self.last_modified.insert(set.id, timestamp.to_string());
        }
        self.sets.push(set.clone());
        set
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[async_trait]
impl ProjectRegistry for StaticRegistry {
    async fn find_project_by_path(&self, path: &str) -> Result<Option<Project>> {
        Ok(self.projects.iter().find(|p| p.path == path).cloned())
    }

    async fn translation_sets_for_project(&self, project_id: u64) -> Result<Vec<TranslationSet>> {
        Ok(self
            .sets
            .iter()
            .filter(|set| set.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FreshnessProvider for StaticRegistry {
    async fn last_modified(&self, set: &TranslationSet) -> Result<Option<String>> {
        Ok(self.last_modified.get(&set.id).cloned())
    }
}
