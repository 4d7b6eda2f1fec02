//! Result type alias for carefree-mongodb
//!
//! This module provides a convenient Result type alias that uses CarefreeError
//! as the error type.

use super::errors::CarefreeError;

/// Result type alias for carefree operations
///
/// # Examples
///
/// ```
/// use carefree_mongodb::domain::result::Result;
/// use carefree_mongodb::domain::errors::CarefreeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CarefreeError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CarefreeError>;
