//! Driver options construction
//!
//! - [`translator`] - Applies [`MongoSettings`](crate::config::MongoSettings) to `ClientOptions`
//! - [`summary`] - Printable view of the resulting options

pub mod summary;
pub mod translator;

pub use summary::OptionsSummary;
pub use translator::{build_client_options, OptionsTranslator};
