#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_lossless,            // Infallible casts are clear enough with `as`
    clippy::cast_possible_truncation, // Durations in milliseconds fit in u64
    clippy::cast_possible_wrap,       // Safe in non-negative contexts
    clippy::cast_precision_loss,      // u64 beyond i64 range becomes f64 on purpose
    clippy::cast_sign_loss,           // Safe where values are known non-negative
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. IngestError in sender module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod domain;
pub mod normalizer;
pub mod parser;
pub mod sender;

// Re-export main types for easy access
pub use app::{BatchDriver, Config};
pub use domain::{LogBatch, NormalizedEvent};
pub use normalizer::EventNormalizer;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
