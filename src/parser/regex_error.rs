// Regex error handling for the static pattern registry and named-group extraction
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RegexError {
    #[error("Regex compilation failed for pattern '{pattern}' (name: {name}): {source}")]
    CompilationFailed {
        pattern: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Regex pattern not found: {name}")]
    PatternNotFound { name: String },

    #[error("Pattern '{name}' did not match input")]
    NoMatch { name: String },
}
