//! Freshness comparison between server translation sets and client catalogs.

use crate::protocol::{CurrentTranslation, UpdateCandidate};
use crate::registry::TranslationSet;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M %z",
];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a timestamp from the freshness provider or a client catalog header.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM[:SS]` with or without a numeric offset
/// (`+0000`, `+00:00`), and bare dates. Values without an offset are UTC.
/// Anything unparseable is the Unix epoch, so it always compares as stale.
pub fn parse_timestamp(value: &str) -> DateTime<Utc> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(&Utc);
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return dt.with_timezone(&Utc);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return dt.and_utc();
        }
    }

    if let Some(dt) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return dt.and_utc();
    }

    if !value.is_empty() {
        debug!("Unparseable timestamp '{}', treating as epoch", value);
    }
    DateTime::<Utc>::default()
}

/// Pair each requested locale with every translation set stored under it.
///
/// Matching is exact string equality; sets are already keyed by short code.
pub fn match_sets<'l, 's>(
    locales: &'l BTreeSet<String>,
    sets: &'s [TranslationSet],
) -> Vec<(&'l str, &'s TranslationSet)> {
    locales
        .iter()
        .flat_map(|locale| {
            sets.iter()
                .filter(move |set| set.locale == *locale)
                .map(move |set| (locale.as_str(), set))
        })
        .collect()
}

/// Drop candidates the client already has.
///
/// With no installed translations every candidate is an update. Otherwise a
/// candidate survives only when the client reports a catalog for the same
/// language with an older revision date. Languages missing from a non-empty
/// `current` map are dropped.
pub fn exclude_up_to_date(
    candidates: Vec<UpdateCandidate>,
    current: &BTreeMap<String, CurrentTranslation>,
) -> Vec<UpdateCandidate> {
    if current.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|candidate| match current.get(&candidate.language) {
            Some(installed) => {
                let available = parse_timestamp(&candidate.updated);
                let installed_at = installed
                    .revision_date
                    .as_deref()
                    .map(parse_timestamp)
                    .unwrap_or_default();

                let newer = available > installed_at;
                if !newer {
                    debug!(
                        "{} is up to date ({} >= {})",
                        candidate.language, installed_at, available
                    );
                }
                newer
            }
            None => false,
        })
        .collect()
}
