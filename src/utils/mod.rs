//! Utility modules shared by the pipeline stages.
//!
//! - [`HttpClient`]: reqwest client with the crate's user agent and timeouts
//! - [`truncate`]: character-limited truncation with an ellipsis marker
//! - [`normalize_whitespace`]: collapse feed text onto one line
//! - [`html_escape`]: escape text for the HTML digest body

mod http;
mod text;

pub use http::{HttpClient, USER_AGENT};
pub use text::{html_escape, normalize_whitespace, truncate, ELLIPSIS};
