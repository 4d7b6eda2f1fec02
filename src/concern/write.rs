//! Write concern grammar
//!
//! Accepted forms, case-insensitive, whitespace ignored:
//!
//! - aliases: `w0` (unacknowledged), `w1`, `w2`, `w3`, `majority`, `journal`
//! - `w<n>`: acknowledgment from `n` nodes
//! - `w<n>-<timeout ms>-<true|false>`: node count, write timeout and journal flag

use super::{is_digits, parse_number, strip_whitespace};
use crate::domain::ConcernParseError;
use mongodb::options::{Acknowledgment, WriteConcern};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A resolved write concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WriteConcernSpec {
    /// `w: 0`, fire and forget
    Unacknowledged,
    /// `w: 1`
    W1,
    /// `w: 2`
    W2,
    /// `w: 3`
    W3,
    /// `w: "majority"`
    Majority,
    /// `j: true`
    Journaled,
    /// Explicit node count with optional timeout and journal flag
    Custom {
        w: u32,
        timeout_ms: Option<u64>,
        journal: Option<bool>,
    },
}

impl WriteConcernSpec {
    /// Converts into the driver's write concern
    pub fn to_write_concern(&self) -> WriteConcern {
        let mut concern = WriteConcern::default();
        match *self {
            WriteConcernSpec::Unacknowledged => concern.w = Some(Acknowledgment::Nodes(0)),
            WriteConcernSpec::W1 => concern.w = Some(Acknowledgment::Nodes(1)),
            WriteConcernSpec::W2 => concern.w = Some(Acknowledgment::Nodes(2)),
            WriteConcernSpec::W3 => concern.w = Some(Acknowledgment::Nodes(3)),
            WriteConcernSpec::Majority => concern.w = Some(Acknowledgment::Majority),
            WriteConcernSpec::Journaled => concern.journal = Some(true),
            WriteConcernSpec::Custom {
                w,
                timeout_ms,
                journal,
            } => {
                concern.w = Some(Acknowledgment::Nodes(w));
                concern.w_timeout = timeout_ms.map(Duration::from_millis);
                concern.journal = journal;
            }
        }
        concern
    }
}

impl fmt::Display for WriteConcernSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteConcernSpec::Unacknowledged => write!(f, "w0"),
            WriteConcernSpec::W1 => write!(f, "w1"),
            WriteConcernSpec::W2 => write!(f, "w2"),
            WriteConcernSpec::W3 => write!(f, "w3"),
            WriteConcernSpec::Majority => write!(f, "majority"),
            WriteConcernSpec::Journaled => write!(f, "journal"),
            WriteConcernSpec::Custom {
                w,
                timeout_ms: Some(timeout),
                journal: Some(journal),
            } => write!(f, "w{w}-{timeout}-{journal}"),
            WriteConcernSpec::Custom { w, .. } => write!(f, "w{w}"),
        }
    }
}

/// Parses a write concern string
///
/// Returns `Ok(None)` when the value matches no known form, and an error only
/// when a node count or timeout overflows.
///
/// # Examples
///
/// ```
/// use carefree_mongodb::concern::{parse_write_concern, WriteConcernSpec};
///
/// assert_eq!(parse_write_concern("MAJORITY").unwrap(), Some(WriteConcernSpec::Majority));
/// assert_eq!(
///     parse_write_concern("w2-10000-true").unwrap(),
///     Some(WriteConcernSpec::Custom { w: 2, timeout_ms: Some(10000), journal: Some(true) })
/// );
/// assert_eq!(parse_write_concern("w2-soon").unwrap(), None);
/// ```
pub fn parse_write_concern(value: &str) -> Result<Option<WriteConcernSpec>, ConcernParseError> {
    let culled = strip_whitespace(value).to_ascii_lowercase();

    let spec = match culled.as_str() {
        "w0" => WriteConcernSpec::Unacknowledged,
        "w1" => WriteConcernSpec::W1,
        "w2" => WriteConcernSpec::W2,
        "w3" => WriteConcernSpec::W3,
        "majority" => WriteConcernSpec::Majority,
        "journal" => WriteConcernSpec::Journaled,
        _ => return parse_custom(value, &culled),
    };

    Ok(Some(spec))
}

fn parse_custom(input: &str, culled: &str) -> Result<Option<WriteConcernSpec>, ConcernParseError> {
    let Some(rest) = culled.strip_prefix('w') else {
        return Ok(None);
    };

    let parts: Vec<&str> = rest.split('-').collect();
    match parts.as_slice() {
        [w] if is_digits(w) => Ok(Some(WriteConcernSpec::Custom {
            w: parse_number(input, w)?,
            timeout_ms: None,
            journal: None,
        })),
        [w, timeout, journal] if is_digits(w) && is_digits(timeout) => {
            let journal = match *journal {
                "true" => true,
                "false" => false,
                _ => return Ok(None),
            };
            Ok(Some(WriteConcernSpec::Custom {
                w: parse_number(input, w)?,
                timeout_ms: Some(parse_number(input, timeout)?),
                journal: Some(journal),
            }))
        }
        _ => Ok(None),
    }
}
