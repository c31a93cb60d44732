//! Human-readable output formatting.

pub mod terminal;

pub use terminal::format_posterior;
