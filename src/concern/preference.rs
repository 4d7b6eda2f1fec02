//! Read preference grammar
//!
//! ```text
//! preference := mode [ "-[" [ tagset ( "," tagset )* ] "]" ] [ "-" digits ]
//! tagset     := "{" tag ( "," tag )* "}"
//! tag        := name "=" value
//! ```
//!
//! `mode` is one of `primary`, `primaryPreferred`, `secondary`,
//! `secondaryPreferred`, `nearest` (any case); names and values are
//! alphanumeric; the trailing digits are the max staleness in milliseconds.
//!
//! Examples: `nearest`, `primaryPreferred-5000`, `secondary-[{a=0,b=1}]`,
//! `secondary-[{a=0,b=1},{c=3,d=4}]-10000`.

use super::{is_digits, parse_number, strip_whitespace};
use crate::domain::ConcernParseError;
use mongodb::options::{ReadPreference, ReadPreferenceOptions, TagSet};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Read preference mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadPreferenceMode {
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
    Nearest,
}

impl ReadPreferenceMode {
    /// Looks a mode up by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "primary" => Some(ReadPreferenceMode::Primary),
            "primarypreferred" => Some(ReadPreferenceMode::PrimaryPreferred),
            "secondary" => Some(ReadPreferenceMode::Secondary),
            "secondarypreferred" => Some(ReadPreferenceMode::SecondaryPreferred),
            "nearest" => Some(ReadPreferenceMode::Nearest),
            _ => None,
        }
    }

    /// Canonical camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadPreferenceMode::Primary => "primary",
            ReadPreferenceMode::PrimaryPreferred => "primaryPreferred",
            ReadPreferenceMode::Secondary => "secondary",
            ReadPreferenceMode::SecondaryPreferred => "secondaryPreferred",
            ReadPreferenceMode::Nearest => "nearest",
        }
    }
}

impl fmt::Display for ReadPreferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `name=value` server tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// An ordered set of tags a candidate server must carry, all of them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSetSpec {
    pub tags: Vec<Tag>,
}

impl TagSetSpec {
    /// Converts into the driver's tag set
    pub fn to_tag_set(&self) -> TagSet {
        self.tags
            .iter()
            .map(|tag| (tag.name.clone(), tag.value.clone()))
            .collect()
    }
}

impl fmt::Display for TagSetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self
            .tags
            .iter()
            .map(|tag| format!("{}={}", tag.name, tag.value))
            .collect();
        write!(f, "{{{}}}", pairs.join(","))
    }
}

/// A resolved read preference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadPreferenceSpec {
    pub mode: ReadPreferenceMode,
    /// Tag sets in order of preference; empty when not specified
    pub tag_sets: Vec<TagSetSpec>,
    pub max_staleness_ms: Option<u64>,
}

impl ReadPreferenceSpec {
    /// Builds the driver read preference.
    ///
    /// `primary` never carries options; any configured tag sets or staleness
    /// are dropped with a warning. The other modes pick one of four shapes
    /// depending on which of tag sets and max staleness are present.
    pub fn to_read_preference(&self) -> ReadPreference {
        let options = match (self.tag_sets.is_empty(), self.max_staleness_ms) {
            (true, None) => None,
            (false, None) => Some(self.options(true, false)),
            (true, Some(_)) => Some(self.options(false, true)),
            (false, Some(_)) => Some(self.options(true, true)),
        };

        match self.mode {
            ReadPreferenceMode::Primary => {
                if options.is_some() {
                    tracing::warn!(
                        read_preference = %self,
                        "primary read preference ignores tag sets and max staleness"
                    );
                }
                ReadPreference::Primary
            }
            ReadPreferenceMode::PrimaryPreferred => ReadPreference::PrimaryPreferred { options },
            ReadPreferenceMode::Secondary => ReadPreference::Secondary { options },
            ReadPreferenceMode::SecondaryPreferred => {
                ReadPreference::SecondaryPreferred { options }
            }
            ReadPreferenceMode::Nearest => ReadPreference::Nearest { options },
        }
    }

    fn options(&self, with_tag_sets: bool, with_staleness: bool) -> ReadPreferenceOptions {
        let mut options = ReadPreferenceOptions::default();
        if with_tag_sets {
            options.tag_sets = Some(self.tag_sets.iter().map(TagSetSpec::to_tag_set).collect());
        }
        if with_staleness {
            options.max_staleness = self.max_staleness_ms.map(Duration::from_millis);
        }
        options
    }
}

impl fmt::Display for ReadPreferenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mode)?;
        if !self.tag_sets.is_empty() {
            let sets: Vec<String> = self.tag_sets.iter().map(ToString::to_string).collect();
            write!(f, "-[{}]", sets.join(","))?;
        }
        if let Some(staleness) = self.max_staleness_ms {
            write!(f, "-{staleness}")?;
        }
        Ok(())
    }
}

/// Parses a read preference string
///
/// Returns `Ok(None)` when the value does not fit the grammar or names an
/// unknown mode. A tag that is not exactly one `name=value` pair, a repeated
/// tag name and an overflowing staleness are hard errors.
///
/// ```
/// use carefree_mongodb::concern::{parse_read_preference, ReadPreferenceMode};
///
/// let spec = parse_read_preference("primaryPreferred-5000").unwrap().unwrap();
/// assert_eq!(spec.mode, ReadPreferenceMode::PrimaryPreferred);
/// assert!(spec.tag_sets.is_empty());
/// assert_eq!(spec.max_staleness_ms, Some(5000));
///
/// assert!(parse_read_preference("secondary-[{a}]").is_err());
/// ```
pub fn parse_read_preference(
    value: &str,
) -> Result<Option<ReadPreferenceSpec>, ConcernParseError> {
    let culled = strip_whitespace(value);
    let Some(raw) = RawPreference::split(&culled) else {
        return Ok(None);
    };
    let Some(mode) = ReadPreferenceMode::from_name(raw.mode) else {
        return Ok(None);
    };

    let tag_sets = raw
        .tag_sets
        .iter()
        .map(|body| parse_tag_set(value, body))
        .collect::<Result<Vec<_>, _>>()?;

    let max_staleness_ms = raw
        .staleness
        .map(|digits| parse_number(value, digits))
        .transpose()?;

    Ok(Some(ReadPreferenceSpec {
        mode,
        tag_sets,
        max_staleness_ms,
    }))
}

/// Lexical split of a read preference into its three segments
struct RawPreference<'a> {
    mode: &'a str,
    tag_sets: Vec<&'a str>,
    staleness: Option<&'a str>,
}

impl<'a> RawPreference<'a> {
    fn split(input: &'a str) -> Option<Self> {
        let mut cursor = Cursor::new(input);

        let mode = cursor.take_while(|c| c.is_ascii_alphabetic());
        if mode.is_empty() {
            return None;
        }

        let mut tag_sets = Vec::new();
        if cursor.eat("-[") && !cursor.eat("]") {
            loop {
                if !cursor.eat("{") {
                    return None;
                }
                let body = cursor.take_while(|c| c.is_ascii_alphanumeric() || c == '=' || c == ',');
                if body.is_empty() || !cursor.eat("}") {
                    return None;
                }
                tag_sets.push(body);

                if cursor.eat("]") {
                    break;
                }
                if !cursor.eat(",") {
                    return None;
                }
            }
        }

        let mut staleness = None;
        if cursor.eat("-") {
            let digits = cursor.take_while(|c| c.is_ascii_digit());
            if !is_digits(digits) {
                return None;
            }
            staleness = Some(digits);
        }

        cursor.is_at_end().then_some(RawPreference {
            mode,
            tag_sets,
            staleness,
        })
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map_or(rest.len(), |(index, _)| index);
        self.pos += len;
        &rest[..len]
    }

    fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }
}

fn parse_tag_set(input: &str, body: &str) -> Result<TagSetSpec, ConcernParseError> {
    let mut tags: Vec<Tag> = Vec::new();
    for element in body.split(',') {
        let parts: Vec<&str> = element.split('=').collect();
        let [name, value] = parts.as_slice() else {
            return Err(invalid_tag(input, element));
        };
        if name.is_empty() || value.is_empty() {
            return Err(invalid_tag(input, element));
        }
        if tags.iter().any(|tag| tag.name == *name) {
            return Err(ConcernParseError::DuplicateTag {
                input: input.to_string(),
                name: name.to_string(),
            });
        }
        tags.push(Tag {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(TagSetSpec { tags })
}

fn invalid_tag(input: &str, element: &str) -> ConcernParseError {
    ConcernParseError::InvalidTag {
        input: input.to_string(),
        tag: element.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn tag_set(pairs: &[(&str, &str)]) -> TagSetSpec {
        TagSetSpec {
            tags: pairs
                .iter()
                .map(|(name, value)| Tag {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    fn parse(value: &str) -> ReadPreferenceSpec {
        parse_read_preference(value)
            .expect("parse error")
            .expect("unresolved")
    }

    #[test]
    fn test_mode_tag_sets_and_staleness() {
        let spec = parse("secondary-[{a=0,b=1},{c=3,d=4}]-10000");
        assert_eq!(spec.mode, ReadPreferenceMode::Secondary);
        assert_eq!(
            spec.tag_sets,
            vec![
                tag_set(&[("a", "0"), ("b", "1")]),
                tag_set(&[("c", "3"), ("d", "4")])
            ]
        );
        assert_eq!(spec.max_staleness_ms, Some(10000));
    }

    #[test]
    fn test_mode_only() {
        let spec = parse("nearest");
        assert_eq!(spec.mode, ReadPreferenceMode::Nearest);
        assert!(spec.tag_sets.is_empty());
        assert_eq!(spec.max_staleness_ms, None);
    }

    #[test]
    fn test_staleness_only() {
        let spec = parse("primaryPreferred-5000");
        assert_eq!(spec.mode, ReadPreferenceMode::PrimaryPreferred);
        assert!(spec.tag_sets.is_empty());
        assert_eq!(spec.max_staleness_ms, Some(5000));
    }

    #[test]
    fn test_tag_sets_only() {
        let spec = parse("secondaryPreferred-[{dc=east}]");
        assert_eq!(spec.mode, ReadPreferenceMode::SecondaryPreferred);
        assert_eq!(spec.tag_sets, vec![tag_set(&[("dc", "east")])]);
        assert_eq!(spec.max_staleness_ms, None);
    }

    #[test]
    fn test_empty_brackets_mean_no_tag_sets() {
        let spec = parse("secondary-[]-90000");
        assert!(spec.tag_sets.is_empty());
        assert_eq!(spec.max_staleness_ms, Some(90000));
    }

    #[test]
    fn test_whitespace_is_stripped_globally() {
        let spec = parse(" secondary - [ { a = 0 , b = 1 } ] - 10000 ");
        assert_eq!(spec.tag_sets, vec![tag_set(&[("a", "0"), ("b", "1")])]);
        assert_eq!(spec.max_staleness_ms, Some(10000));
    }

    #[test_case("primary", ReadPreferenceMode::Primary)]
    #[test_case("PRIMARY", ReadPreferenceMode::Primary)]
    #[test_case("primarypreferred", ReadPreferenceMode::PrimaryPreferred)]
    #[test_case("Secondary", ReadPreferenceMode::Secondary)]
    #[test_case("SECONDARYPREFERRED", ReadPreferenceMode::SecondaryPreferred)]
    #[test_case("nEaReSt", ReadPreferenceMode::Nearest)]
    fn test_modes_are_case_insensitive(input: &str, expected: ReadPreferenceMode) {
        assert_eq!(parse(input).mode, expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("fastest" ; "unknown mode")]
    #[test_case("secondary-" ; "dangling dash")]
    #[test_case("secondary-[" ; "unclosed bracket")]
    #[test_case("secondary-[{a=0}" ; "missing closing bracket")]
    #[test_case("secondary-[{}]" ; "empty tag set")]
    #[test_case("secondary-[{a=0}{b=1}]" ; "missing comma between sets")]
    #[test_case("secondary-[{a=0},]" ; "trailing comma")]
    #[test_case("secondary-[{dc=us-east}]" ; "dash in tag value")]
    #[test_case("secondary-10000-[{a=0}]" ; "segments out of order")]
    #[test_case("secondary-abc" ; "non numeric staleness")]
    #[test_case("2secondary" ; "leading digit")]
    fn test_unmatched_values_are_unresolved(input: &str) {
        assert_eq!(parse_read_preference(input).unwrap(), None);
    }

    #[test_case("secondary-[{a}]", "a" ; "missing equals")]
    #[test_case("secondary-[{a=0,b}]", "b" ; "second tag missing equals")]
    #[test_case("nearest-[{a=0=1}]", "a=0=1" ; "two equals")]
    #[test_case("nearest-[{=0}]", "=0" ; "empty name")]
    #[test_case("nearest-[{a=}]", "a=" ; "empty value")]
    #[test_case("nearest-[{a=0,,b=1}]", "" ; "empty element")]
    fn test_malformed_tag_is_a_hard_error(input: &str, bad_tag: &str) {
        let err = parse_read_preference(input).unwrap_err();
        assert_eq!(
            err,
            ConcernParseError::InvalidTag {
                input: input.to_string(),
                tag: bad_tag.to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_tag_name_is_a_hard_error() {
        let err = parse_read_preference("nearest-[{a=0,a=1}]").unwrap_err();
        assert!(matches!(err, ConcernParseError::DuplicateTag { ref name, .. } if name == "a"));
    }

    #[test]
    fn test_same_tag_name_in_different_sets_is_allowed() {
        let spec = parse("nearest-[{dc=east},{dc=west}]");
        assert_eq!(spec.tag_sets.len(), 2);
    }

    #[test]
    fn test_overflowing_staleness_is_a_hard_error() {
        let err = parse_read_preference("nearest-99999999999999999999999").unwrap_err();
        assert!(matches!(err, ConcernParseError::NumberOutOfRange { .. }));
    }

    #[test]
    fn test_primary_ignores_tag_sets_and_staleness() {
        let spec = parse("primary-[{a=0}]-10000");
        assert_eq!(spec.to_read_preference(), ReadPreference::Primary);
    }

    #[test]
    fn test_decision_table_neither() {
        assert_eq!(
            parse("secondary").to_read_preference(),
            ReadPreference::Secondary { options: None }
        );
    }

    #[test]
    fn test_decision_table_tag_sets_only() {
        let ReadPreference::Nearest {
            options: Some(options),
        } = parse("nearest-[{a=0,b=1}]").to_read_preference()
        else {
            panic!("expected nearest with options");
        };
        let tag_sets = options.tag_sets.expect("tag sets");
        assert_eq!(tag_sets.len(), 1);
        assert_eq!(tag_sets[0].get("a").map(String::as_str), Some("0"));
        assert_eq!(tag_sets[0].get("b").map(String::as_str), Some("1"));
        assert_eq!(options.max_staleness, None);
    }

    #[test]
    fn test_decision_table_staleness_only() {
        let ReadPreference::PrimaryPreferred {
            options: Some(options),
        } = parse("primaryPreferred-5000").to_read_preference()
        else {
            panic!("expected primaryPreferred with options");
        };
        assert_eq!(options.tag_sets, None);
        assert_eq!(options.max_staleness, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn test_decision_table_both() {
        let ReadPreference::SecondaryPreferred {
            options: Some(options),
        } = parse("secondaryPreferred-[{a=0},{c=3}]-90000").to_read_preference()
        else {
            panic!("expected secondaryPreferred with options");
        };
        let tag_sets = options.tag_sets.expect("tag sets");
        assert_eq!(tag_sets.len(), 2);
        assert_eq!(tag_sets[1].get("c").map(String::as_str), Some("3"));
        assert_eq!(options.max_staleness, Some(Duration::from_millis(90000)));
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(
            parse(" SECONDARY - [ {a=0, b=1}, {c=3} ] - 10000").to_string(),
            "secondary-[{a=0,b=1},{c=3}]-10000"
        );
        assert_eq!(parse("nearest").to_string(), "nearest");
    }
}
