//! Resolution of client item identifiers to GlotPress projects.

use crate::error::ResolveError;
use crate::registry::{Project, ProjectRegistry, TranslationSet};
use std::sync::Arc;
use tracing::{debug, warn};

const PROJECTS_PREFIX: &str = "/projects";

/// Canonical project path for a client item identifier.
///
/// Removes a leading `/projects` path segment (only a whole segment, so
/// `/projects2/foo` and `sprojects/foo` are left alone), then trims leading
/// and trailing slashes.
pub fn normalize_project_path(item: &str) -> &str {
    let path = match item.strip_prefix(PROJECTS_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => item,
    };

    path.trim_matches('/')
}

/// Looks projects and their translation sets up in a `ProjectRegistry`.
#[derive(Clone)]
pub struct ProjectResolver {
    registry: Arc<dyn ProjectRegistry>,
}

impl ProjectResolver {
    pub fn new(registry: Arc<dyn ProjectRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve an item identifier to a project.
    pub async fn resolve(&self, item: &str) -> Result<Project, ResolveError> {
        let path = normalize_project_path(item);
        debug!("Resolving item '{}' as project path '{}'", item, path);

        match self.registry.find_project_by_path(path).await? {
            Some(project) => Ok(project),
            None => {
                warn!("Project not found: {}", path);
                Err(ResolveError::ProjectNotFound(path.to_string()))
            }
        }
    }

    /// Translation sets of a resolved project; empty is an error.
    pub async fn translation_sets_of(
        &self,
        project: &Project,
    ) -> Result<Vec<TranslationSet>, ResolveError> {
        let sets = self.registry.translation_sets_for_project(project.id).await?;

        if sets.is_empty() {
            warn!("No translation sets found for project: {}", project.path);
            return Err(ResolveError::NoTranslationSets(project.path.clone()));
        }

        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use anyhow::Result;
    use async_trait::async_trait;

    // ==================== Path Normalization Tests ====================

    #[test]
    fn test_strips_projects_prefix() {
        assert_eq!(normalize_project_path("/projects/my-plugin"), "my-plugin");
        assert_eq!(normalize_project_path("/projects/my-plugin/"), "my-plugin");
        assert_eq!(
            normalize_project_path("/projects/plugins/my-plugin//"),
            "plugins/my-plugin"
        );
    }

    #[test]
    fn test_plain_paths_pass_through() {
        assert_eq!(normalize_project_path("my-plugin"), "my-plugin");
        assert_eq!(normalize_project_path("/my-plugin/"), "my-plugin");
        assert_eq!(normalize_project_path("plugins/my-plugin"), "plugins/my-plugin");
    }

    #[test]
    fn test_prefix_must_be_whole_segment() {
        assert_eq!(normalize_project_path("/projects2/foo"), "projects2/foo");
        assert_eq!(normalize_project_path("sprojects/foo"), "sprojects/foo");
        assert_eq!(normalize_project_path("/projectsfoo"), "projectsfoo");
        // Letters of "/projects" are not stripped as a character set
        assert_eq!(normalize_project_path("/post-types"), "post-types");
    }

    #[test]
    fn test_prefix_only() {
        assert_eq!(normalize_project_path("/projects"), "");
        assert_eq!(normalize_project_path("/projects/"), "");
    }

    #[test]
    fn test_prefix_is_stripped_once() {
        assert_eq!(
            normalize_project_path("/projects/projects/nested"),
            "projects/nested"
        );
    }

    // ==================== Resolver Tests ====================

    fn resolver_with(registry: StaticRegistry) -> ProjectResolver {
        ProjectResolver::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut registry = StaticRegistry::new();
        registry.add_project("my-plugin", Some("My Plugin"));

        let project = resolver_with(registry)
            .resolve("/projects/my-plugin/")
            .await
            .unwrap();
        assert_eq!(project.path, "my-plugin");
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let result = resolver_with(StaticRegistry::new()).resolve("/projects/missing").await;
        match result {
            Err(ResolveError::ProjectNotFound(path)) => assert_eq!(path, "missing"),
            other => panic!("Expected ProjectNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_translation_sets_of() {
        let mut registry = StaticRegistry::new();
        let project = registry.add_project("my-plugin", None);
        registry.add_translation_set(&project, "pl", "default", None, None);
        registry.add_translation_set(&project, "de", "default", None, None);

        let sets = resolver_with(registry).translation_sets_of(&project).await.unwrap();
        assert_eq!(sets.len(), 2);
    }

    #[tokio::test]
    async fn test_translation_sets_of_empty() {
        let mut registry = StaticRegistry::new();
        let project = registry.add_project("my-plugin", None);

        let result = resolver_with(registry).translation_sets_of(&project).await;
        assert!(matches!(result, Err(ResolveError::NoTranslationSets(_))));
    }

    struct FailingRegistry;

    #[async_trait]
    impl ProjectRegistry for FailingRegistry {
        async fn find_project_by_path(&self, _path: &str) -> Result<Option<Project>> {
            anyhow::bail!("database unavailable")
        }

        async fn translation_sets_for_project(&self, _id: u64) -> Result<Vec<TranslationSet>> {
            anyhow::bail!("database unavailable")
        }
    }

    #[tokio::test]
    async fn test_registry_failure_is_propagated() {
        let resolver = ProjectResolver::new(Arc::new(FailingRegistry));
        let result = resolver.resolve("my-plugin").await;
        assert!(matches!(result, Err(ResolveError::Registry(_))));
    }
}
