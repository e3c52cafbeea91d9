//! Scorer error types

use thiserror::Error;

/// Reasons a raw record cannot become a lead
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Advertiser name is missing or blank
    #[error("missing advertiser")]
    MissingAdvertiser,

    /// Library identifier is missing or blank
    #[error("missing library id")]
    MissingLibraryId,

    /// Facebook link is missing or does not point at facebook.com
    #[error("invalid Facebook link: {0:?}")]
    InvalidFacebookLink(String),

    /// Link points at a numeric profile id instead of a page name
    #[error("numeric page name: {0}")]
    NumericPageName(String),
}

/// Errors that can occur during scoring
#[derive(Error, Debug)]
pub enum ScorerError {
    /// Record rejected before enrichment
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Website probe could not run
    #[error("Probe error: {0}")]
    Probe(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
