//! Parsing of the CLI's selectable-line list syntax.
//!
//! The `stage` subcommand names lines by the ordinals printed by `show`,
//! as a comma-separated list of single ordinals and inclusive ranges:
//!
//! - `0` - the first selectable line
//! - `2..5` - selectable lines 2 through 5 (inclusive)
//! - `0,2..5,9` - any mix of the two
//!
//! # Examples
//!
//! ```
//! use diff_select::parse_ordinals;
//!
//! assert_eq!(parse_ordinals("3").unwrap(), vec![3]);
//! assert_eq!(parse_ordinals("1..3").unwrap(), vec![1, 2, 3]);
//! assert_eq!(parse_ordinals("0,4..5").unwrap(), vec![0, 4, 5]);
//! ```

use error_set::error_set;

error_set! {
    /// Errors from parsing ordinal-list syntax
    OrdinalParseError := {
        /// Entry could not be parsed as a line ordinal
        #[display("Invalid line ordinal '{value}'")]
        InvalidOrdinal { value: String },
        /// Range has start greater than end
        #[display("Invalid range {start}..{end}: start must be <= end")]
        InvalidRange { start: usize, end: usize },
        /// No ordinals provided
        #[display("No line ordinals provided")]
        Empty,
    }
}

/// Parse a comma-separated list of ordinals and inclusive ranges.
///
/// Duplicates are preserved in input order; under toggle semantics a
/// repeated ordinal flips its line back off.
///
/// # Errors
///
/// Returns [`OrdinalParseError`] if an entry is not a number or `N..M`
/// range, a range is inverted, or the list is empty.
pub fn parse_ordinals(input: &str) -> Result<Vec<usize>, OrdinalParseError> {
    let mut ordinals = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some((start, end)) = part.split_once("..") {
            let start = parse_number(start)?;
            let end = parse_number(end)?;
            if start > end {
                return Err(OrdinalParseError::InvalidRange { start, end });
            }
            ordinals.extend(start..=end);
        } else {
            ordinals.push(parse_number(part)?);
        }
    }

    if ordinals.is_empty() {
        return Err(OrdinalParseError::Empty);
    }

    Ok(ordinals)
}

fn parse_number(input: &str) -> Result<usize, OrdinalParseError> {
    input
        .parse::<usize>()
        .map_err(|_| OrdinalParseError::InvalidOrdinal {
            value: input.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn parse_single_ordinal() {
        assert_eq!(parse_ordinals("7").unwrap(), vec![7]);
    }

    #[test]
    fn parse_zero_is_valid() {
        // ordinals are 0-based, unlike file line numbers
        assert_eq!(parse_ordinals("0").unwrap(), vec![0]);
    }

    #[test]
    fn parse_range() {
        assert_eq!(parse_ordinals("2..5").unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn parse_equal_range() {
        assert_eq!(parse_ordinals("4..4").unwrap(), vec![4]);
    }

    #[test]
    fn parse_mixed_list() {
        assert_eq!(parse_ordinals("0,2..4,9").unwrap(), vec![0, 2, 3, 4, 9]);
    }

    #[test]
    fn parse_tolerates_whitespace() {
        assert_eq!(parse_ordinals(" 1, 3 ").unwrap(), vec![1, 3]);
    }

    #[test]
    fn parse_inverted_range() {
        let result = parse_ordinals("5..2");
        assert!(matches!(
            result,
            Err(OrdinalParseError::InvalidRange { start: 5, end: 2 })
        ));
    }

    #[test]
    fn parse_non_numeric() {
        let result = parse_ordinals("1,x");
        assert!(matches!(
            result,
            Err(OrdinalParseError::InvalidOrdinal { .. })
        ));
    }

    #[test]
    fn parse_negative_is_rejected() {
        assert!(parse_ordinals("-1").is_err());
    }

    #[test]
    fn parse_empty_input() {
        assert!(matches!(parse_ordinals(""), Err(OrdinalParseError::Empty)));
        assert!(matches!(parse_ordinals(","), Err(OrdinalParseError::Empty)));
    }
}
