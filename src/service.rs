//! Update-check orchestration.
//!
//! One request flows through: parse → validate → normalize locales →
//! resolve project and match translation sets → filter up-to-date packages.
//! The first failing step ends the request with its error.

use crate::download::build_url;
use crate::error::{ResolveError, UpdateCheckError};
use crate::freshness::{exclude_up_to_date, match_sets};
use crate::locale::{normalize_locales, LanguageCodeStyle, LocaleRegistry};
use crate::project::ProjectResolver;
use crate::protocol::{UpdateCandidate, UpdateCheckRequest};
use crate::registry::{FreshnessProvider, ProjectRegistry};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stateless update-check engine; all data comes from injected collaborators.
pub struct UpdateCheckService {
    resolver: ProjectResolver,
    freshness: Arc<dyn FreshnessProvider>,
    locales: LocaleRegistry,
    supported: HashSet<&'static str>,
    projects_url: String,
    language_style: LanguageCodeStyle,
}

impl UpdateCheckService {
    /// Create a service.
    ///
    /// # Arguments
    /// * `projects` - Project and translation-set lookup
    /// * `freshness` - Last-modified timestamps of translation sets
    /// * `locales` - Locales the server supports
    /// * `projects_url` - Base URL of the projects pages, ending with a slash
    pub fn new(
        projects: Arc<dyn ProjectRegistry>,
        freshness: Arc<dyn FreshnessProvider>,
        locales: LocaleRegistry,
        projects_url: impl Into<String>,
    ) -> Self {
        let supported = locales.all_supported_short_codes();
        Self {
            resolver: ProjectResolver::new(projects),
            freshness,
            locales,
            supported,
            projects_url: projects_url.into(),
            language_style: LanguageCodeStyle::default(),
        }
    }

    pub fn with_language_style(mut self, style: LanguageCodeStyle) -> Self {
        self.language_style = style;
        self
    }

    /// Handle a raw request body.
    pub async fn handle_body(&self, body: &[u8]) -> Result<Vec<UpdateCandidate>, UpdateCheckError> {
        let request = UpdateCheckRequest::from_body(body)?;
        self.check(&request).await
    }

    /// Run an update check for a validated request.
    ///
    /// An empty result is a success: the client is up to date.
    pub async fn check(
        &self,
        request: &UpdateCheckRequest,
    ) -> Result<Vec<UpdateCandidate>, UpdateCheckError> {
        let locales = normalize_locales(&request.locales, &self.supported)?;

        let candidates = self.project_translations_check(&request.item, &locales).await?;
        if candidates.is_empty() {
            return Err(UpdateCheckError::NoTranslationsFound);
        }

        let available = candidates.len();
        let updates = exclude_up_to_date(candidates, &request.translations);

        info!(
            "Update check for '{}': {} package(s) available, {} newer than installed",
            request.item,
            available,
            updates.len()
        );

        Ok(updates)
    }

    /// Every package available for `item` in the given short-code locales,
    /// regardless of what the client has installed.
    ///
    /// `check` only passes codes that normalized against the locale registry.
    /// Direct callers may pass any codes; sets in a locale the registry does
    /// not know are skipped with a warning.
    pub async fn project_translations_check(
        &self,
        item: &str,
        locales: &BTreeSet<String>,
    ) -> Result<Vec<UpdateCandidate>, ResolveError> {
        let project = match self.resolver.resolve(item).await {
            Ok(project) => project,
            Err(ResolveError::ProjectNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let sets = match self.resolver.translation_sets_of(&project).await {
            Ok(sets) => sets,
            Err(ResolveError::NoTranslationSets(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut candidates = Vec::new();

        for (locale, set) in match_sets(locales, &sets) {
            let Some(info) = self.locales.by_short_code(locale) else {
                warn!("Locale not found: {}", locale);
                continue;
            };

            let updated = self.freshness.last_modified(set).await?.unwrap_or_default();
            debug!("{} [{}/{}] last modified '{}'", project.path, locale, set.slug, updated);

            candidates.push(UpdateCandidate {
                language: self.language_style.code_for(info),
                updated,
                package: build_url(&self.projects_url, &project.path, locale, &set.slug),
            });
        }

        Ok(candidates)
    }
}
