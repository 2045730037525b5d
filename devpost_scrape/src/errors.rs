//! Error types for page extraction.

/// Errors that can occur while preparing or running extraction.
///
/// Extraction itself never fails on missing markup; these cover bad
/// configuration and unusable page addresses.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A configured CSS selector could not be compiled.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    /// A selector chain was configured with no selectors at all.
    #[error("selector chain is empty")]
    EmptyChain,
    /// The page URL used to resolve relative links is not absolute.
    #[error("invalid page url `{0}`")]
    InvalidPageUrl(String),
}
