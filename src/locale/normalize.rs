//! Locale tag normalization.

use crate::error::UpdateCheckError;
use std::collections::{BTreeSet, HashSet};

/// Leading language subtag of a client locale tag.
///
/// `pl_PL` becomes `pl`, `de_DE_formal` becomes `de`, and a tag without an
/// underscore is returned unchanged.
pub fn short_code(tag: &str) -> &str {
    match tag.split_once('_') {
        Some((language, _)) => language,
        None => tag,
    }
}

/// Reduce requested locale tags to the set of supported short codes.
///
/// Tags whose short code is not in `supported` are dropped silently and
/// duplicates collapse. An empty result is an error: a non-empty request
/// that normalizes to nothing means the client and server disagree on
/// locales, which the caller must hear about.
pub fn normalize_locales<I, S>(
    requested: I,
    supported: &HashSet<&str>,
) -> Result<BTreeSet<String>, UpdateCheckError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let locales: BTreeSet<String> = requested
        .into_iter()
        .filter_map(|tag| {
            let code = short_code(tag.as_ref());
            supported.contains(code).then(|| code.to_string())
        })
        .collect();

    if locales.is_empty() {
        return Err(UpdateCheckError::NoLocalesSupported);
    }

    Ok(locales)
}
