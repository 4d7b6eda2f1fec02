//! Concern and preference grammars
//!
//! Settings carry write concern, read concern and read preference as short
//! strings. This module parses them into typed specs and maps the specs onto
//! the driver's option types.
//!
//! | Setting            | Example                                  |
//! |--------------------|------------------------------------------|
//! | `write_concern`    | `majority`, `w5`, `w2-10000-true`        |
//! | `read_concern`     | `local`, `snapshot`                      |
//! | `read_preference`  | `secondary-[{dc=east,rack=1}]-90000`     |
//!
//! Whitespace anywhere in a value is ignored and keywords are case-insensitive.
//!
//! Every parser separates two outcomes: `None` when the value matches no known
//! form (the caller decides whether that is fatal) and
//! [`ConcernParseError`] when the value is recognisably malformed.
//!
//! ```rust
//! use carefree_mongodb::concern::{parse_read_preference, ReadPreferenceMode};
//!
//! let spec = parse_read_preference("secondary-[{a=0,b=1},{c=3,d=4}]-10000")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(spec.mode, ReadPreferenceMode::Secondary);
//! assert_eq!(spec.tag_sets.len(), 2);
//! assert_eq!(spec.max_staleness_ms, Some(10000));
//! ```

pub mod preference;
pub mod read;
pub mod write;

use crate::domain::ConcernParseError;
use std::str::FromStr;

pub use preference::{
    parse_read_preference, ReadPreferenceMode, ReadPreferenceSpec, Tag, TagSetSpec,
};
pub use read::{parse_read_concern, ReadConcernSpec};
pub use write::{parse_write_concern, WriteConcernSpec};

/// Removes every whitespace character from `value`
pub(crate) fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// True for a non-empty run of ASCII digits
pub(crate) fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a digit run, reporting overflow against the original input
pub(crate) fn parse_number<T: FromStr>(input: &str, digits: &str) -> Result<T, ConcernParseError> {
    digits
        .parse()
        .map_err(|_| ConcernParseError::NumberOutOfRange {
            input: input.to_string(),
            digits: digits.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace(" w2 - 100 -\ttrue\n"), "w2-100-true");
        assert_eq!(strip_whitespace("nearest"), "nearest");
    }

    #[test]
    fn test_is_digits() {
        assert!(is_digits("0"));
        assert!(is_digits("10000"));
        assert!(!is_digits(""));
        assert!(!is_digits("10a"));
        assert!(!is_digits("-1"));
    }

    #[test]
    fn test_parse_number_overflow() {
        let result: Result<u32, _> = parse_number("w99999999999", "99999999999");
        assert_eq!(
            result,
            Err(ConcernParseError::NumberOutOfRange {
                input: "w99999999999".to_string(),
                digits: "99999999999".to_string(),
            })
        );
    }
}
