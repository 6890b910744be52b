//! Locale handling for update checks.
//!
//! # Architecture
//!
//! - `registry`: the known GlotPress locales and their metadata
//! - `normalize`: reduction of client locale tags (`pl_PL`) to short codes (`pl`)
//!
//! # Example
//!
//! ```rust,ignore
//! use gp_translate_update_api::locale::{normalize_locales, LocaleRegistry};
//!
//! let registry = LocaleRegistry::with_builtin();
//! let supported = registry.all_supported_short_codes();
//! let locales = normalize_locales(["pl_PL", "de_DE_formal"], &supported)?;
//! ```

mod normalize;
mod registry;

pub use normalize::{normalize_locales, short_code};
pub use registry::{LanguageCodeStyle, LocaleInfo, LocaleRegistry};
