//! Domain types shared across the crate.
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CarefreeError>`]. Grammar failures
//! ([`ConcernParseError`]) and registry failures ([`ComponentError`]) convert
//! into [`CarefreeError`] with the `?` operator:
//!
//! ```rust
//! use carefree_mongodb::concern::parse_read_preference;
//! use carefree_mongodb::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let preference = parse_read_preference("nearest-5000")?;
//!     assert!(preference.is_some());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod errors;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BoxError, CarefreeError, ComponentError, ConcernParseError};
pub use result::Result;
