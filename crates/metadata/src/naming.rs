//! Stateless helpers for deriving names, years and issue numbers from comic
//! filenames.
//!
//! Parsing a full filename into series and issue is delegated to a
//! [`FilenameParser`]; the helpers here cover the simple textual cases and the
//! fallbacks used when the parser comes up empty.

use crate::consts::{NON_DIGIT_REGEX, YEAR_REGEX};

/// Fields a filename parser can recover from a comic filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFilename {
    pub series: Option<String>,
    pub issue: Option<String>,
    pub volume: Option<String>,
    pub year: Option<String>,
    pub issue_count: Option<String>,
}

/// Splits a comic filename into its parts.
pub trait FilenameParser {
    fn parse(&self, name: &str) -> ParsedFilename;
}

impl<F> FilenameParser for F
where
    F: Fn(&str) -> ParsedFilename,
{
    fn parse(&self, name: &str) -> ParsedFilename {
        self(name)
    }
}

/// Everything before the first `#`.
pub fn remove_issue_number(name: &str) -> &str {
    name.split_once('#').map_or(name, |(before, _)| before)
}

/// Left-pad a number with zeros to `length` characters, keeping a leading
/// sign in front of the padding.
///
/// ```
/// use cbnorm_metadata::naming::pad_to_length;
///
/// assert_eq!(pad_to_length("7", 3), "007");
/// assert_eq!(pad_to_length("-7", 3), "-07");
/// assert_eq!(pad_to_length("1234", 3), "1234");
/// ```
pub fn pad_to_length(number: &str, length: usize) -> String {
    let count = number.chars().count();
    if count >= length {
        return number.to_string();
    }
    let (sign, digits) = match number.chars().next() {
        Some(c @ ('+' | '-')) => (Some(c), &number[1..]),
        _ => (None, number),
    };
    let mut padded = String::with_capacity(length);
    padded.extend(sign);
    padded.extend(std::iter::repeat_n('0', length - count));
    padded.push_str(digits);
    padded
}

/// Make a title safe to use as a filename.
pub fn strip_bad_chars(name: &str) -> String {
    name.replace(": ", " - ").replace('/', "-").replace("  ", " ").trim().to_string()
}

/// The last four-digit run in `name`.
pub fn year_from_name(name: &str) -> Option<&str> {
    YEAR_REGEX.find_iter(name).last().map(|m| m.as_str())
}

/// The first four-digit run in a volume string.
pub fn year_from_volume(volume: &str) -> Option<&str> {
    YEAR_REGEX.find(volume).map(|m| m.as_str())
}

/// Digits of the first whitespace-separated token containing `#`.
///
/// Returns `None` when there is no such token or it holds no digits.
pub fn hash_issue_number(name: &str) -> Option<String> {
    let token = name.split_whitespace().find(|part| part.contains('#'))?;
    let digits = NON_DIGIT_REGEX.replace_all(token, "");
    (!digits.is_empty()).then(|| digits.into_owned())
}

/// Issue number of `name` according to `parser`, falling back to
/// [`hash_issue_number`] when the parser finds none.
pub fn issue_number(parser: &impl FilenameParser, name: &str) -> Option<String> {
    parser
        .parse(name)
        .issue
        .filter(|issue| !issue.trim().is_empty())
        .or_else(|| hash_issue_number(name))
}
