//! Runtime configuration loaded from the environment.

use crate::download::projects_url;
use crate::locale::{LanguageCodeStyle, LocaleRegistry};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Where project and translation-set data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// A GlotPress MySQL database
    Database { url: String, table_prefix: String },
    /// A JSON registry file
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    // Site
    pub site_url: String,
    pub port: u16,

    // Data
    pub registry: RegistrySource,

    // Locales
    pub supported_locales: Option<Vec<String>>,
    pub language_style: LanguageCodeStyle,

    // Settings store; not checked by the update-check endpoint
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let database_url = non_empty_var("DATABASE_URL");
        let registry_file = non_empty_var("REGISTRY_FILE");

        let registry = match (database_url, registry_file) {
            (Some(url), None) => RegistrySource::Database {
                url,
                table_prefix: std::env::var("GLOTPRESS_TABLE_PREFIX")
                    .unwrap_or_else(|_| "wp_gp_".to_string()),
            },
            (None, Some(path)) => RegistrySource::File(PathBuf::from(path)),
            (Some(_), Some(_)) => bail!("Set only one of DATABASE_URL and REGISTRY_FILE"),
            (None, None) => bail!("Either DATABASE_URL or REGISTRY_FILE must be set"),
        };

        Ok(Self {
            site_url: std::env::var("SITE_URL").context("SITE_URL not set")?,
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            registry,

            supported_locales: non_empty_var("SUPPORTED_LOCALES").map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            language_style: match non_empty_var("LANGUAGE_CODE_STYLE") {
                Some(style) => style
                    .parse::<LanguageCodeStyle>()
                    .context("Invalid LANGUAGE_CODE_STYLE")?,
                None => LanguageCodeStyle::default(),
            },

            api_key: non_empty_var("GPTUA_API_KEY"),
        })
    }

    /// Base URL of the projects pages, e.g. `https://example.com/projects/`.
    pub fn projects_url(&self) -> String {
        projects_url(&self.site_url)
    }

    /// Locale registry honoring `SUPPORTED_LOCALES`.
    pub fn locale_registry(&self) -> Result<LocaleRegistry> {
        match &self.supported_locales {
            Some(codes) => {
                LocaleRegistry::restricted_to(codes).context("Invalid SUPPORTED_LOCALES")
            }
            None => Ok(LocaleRegistry::with_builtin()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
