//! Read concern grammar: one of `local`, `majority`, `linearizable`, `snapshot`.

use super::strip_whitespace;
use mongodb::options::ReadConcern;
use serde::Serialize;
use std::fmt;

/// A resolved read concern level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadConcernSpec {
    Local,
    Majority,
    Linearizable,
    Snapshot,
}

impl ReadConcernSpec {
    /// Converts into the driver's read concern
    pub fn to_read_concern(&self) -> ReadConcern {
        match self {
            ReadConcernSpec::Local => ReadConcern::local(),
            ReadConcernSpec::Majority => ReadConcern::majority(),
            ReadConcernSpec::Linearizable => ReadConcern::linearizable(),
            ReadConcernSpec::Snapshot => ReadConcern::snapshot(),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ReadConcernSpec::Local => "local",
            ReadConcernSpec::Majority => "majority",
            ReadConcernSpec::Linearizable => "linearizable",
            ReadConcernSpec::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for ReadConcernSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a read concern string, `None` if it names no known level
///
/// ```
/// use carefree_mongodb::concern::{parse_read_concern, ReadConcernSpec};
///
/// assert_eq!(parse_read_concern("Snapshot"), Some(ReadConcernSpec::Snapshot));
/// assert_eq!(parse_read_concern("bogus"), None);
/// ```
pub fn parse_read_concern(value: &str) -> Option<ReadConcernSpec> {
    match strip_whitespace(value).to_ascii_lowercase().as_str() {
        "local" => Some(ReadConcernSpec::Local),
        "majority" => Some(ReadConcernSpec::Majority),
        "linearizable" => Some(ReadConcernSpec::Linearizable),
        "snapshot" => Some(ReadConcernSpec::Snapshot),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("local", ReadConcernSpec::Local)]
    #[test_case("LOCAL", ReadConcernSpec::Local)]
    #[test_case("majority", ReadConcernSpec::Majority)]
    #[test_case("Majority", ReadConcernSpec::Majority)]
    #[test_case("linearizable", ReadConcernSpec::Linearizable)]
    #[test_case("LinearIzable", ReadConcernSpec::Linearizable)]
    #[test_case("snapshot", ReadConcernSpec::Snapshot)]
    #[test_case(" SNAPSHOT ", ReadConcernSpec::Snapshot)]
    fn test_levels_are_case_insensitive(input: &str, expected: ReadConcernSpec) {
        assert_eq!(parse_read_concern(input), Some(expected));
    }

    #[test_case("bogus")]
    #[test_case("")]
    #[test_case("available")]
    #[test_case("local-majority")]
    fn test_unknown_levels_are_unresolved(input: &str) {
        assert_eq!(parse_read_concern(input), None);
    }

    #[test]
    fn test_to_read_concern() {
        assert_eq!(ReadConcernSpec::Local.to_read_concern(), ReadConcern::local());
        assert_eq!(
            ReadConcernSpec::Majority.to_read_concern(),
            ReadConcern::majority()
        );
        assert_eq!(
            ReadConcernSpec::Linearizable.to_read_concern(),
            ReadConcern::linearizable()
        );
        assert_eq!(
            ReadConcernSpec::Snapshot.to_read_concern(),
            ReadConcern::snapshot()
        );
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        for spec in [
            ReadConcernSpec::Local,
            ReadConcernSpec::Majority,
            ReadConcernSpec::Linearizable,
            ReadConcernSpec::Snapshot,
        ] {
            assert_eq!(parse_read_concern(&spec.to_string()), Some(spec));
        }
    }
}
