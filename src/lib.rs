//! Translation update-check API for GlotPress.
//!
//! Clients post the item they have installed, the locales they want and the
//! revision dates of the catalogs they already have; the server answers with
//! the download URLs of every newer translation package.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod download;
pub mod error;
pub mod freshness;
pub mod locale;
pub mod project;
pub mod protocol;
pub mod registry;
pub mod retry;
pub mod service;

pub use error::UpdateCheckError;
pub use protocol::{CurrentTranslation, UpdateCandidate, UpdateCheckPayload, UpdateCheckRequest};
pub use service::UpdateCheckService;
