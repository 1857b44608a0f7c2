//! Engine construction errors.
//!
//! There is no distinguished "parse failure": any input yields a valid
//! `ParseResult`. Errors exist only for configuration contract violations
//! caught when the engine is built, so a bad deployment fails fast instead
//! of silently under-extracting.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaggingError {
    #[error("invalid pattern for category '{category}': {source}")]
    InvalidCategoryPattern {
        category: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid {what} pattern: {source}")]
    InvalidPattern {
        what: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("duplicate strategy id: {0}")]
    DuplicateStrategy(String),

    #[error("no strategies registered")]
    NoStrategies,
}
