use alloc::string::{String, ToString};
use alloc::vec::Vec;

use regex::Regex;

use crate::DecodeError;

// -----------------------------------------------------------------------------
// Splitting

#[inline]
const fn depth_change(c: char) -> i32 {
    match c {
        '[' | '{' | '(' => 1,
        ']' | '}' | ')' => -1,
        _ => 0,
    }
}

/// Returns `true` if no bracket closes before it opens and all are closed.
fn is_balanced(text: &str) -> bool {
    let mut depth = 0;
    for c in text.chars() {
        depth += depth_change(c);
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// Splits `text` at matches of `separator` that are not nested in brackets.
///
/// With `max`, at most that many pieces are returned and the last one holds
/// the rest of the text.
///
/// # Examples
///
/// ```
/// use refstr_decode::split_top_level;
/// use regex::Regex;
///
/// let comma = Regex::new(",").unwrap();
/// assert_eq!(split_top_level("a,[b,c],d", &comma, None), ["a", "[b,c]", "d"]);
/// assert_eq!(split_top_level("a,b,c", &comma, Some(2)), ["a", "b,c"]);
/// ```
pub fn split_top_level<'a>(text: &'a str, separator: &Regex, max: Option<usize>) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    if max == Some(0) {
        return pieces;
    }

    let mut depth = 0;
    let mut scanned = 0;
    let mut piece_start = 0;
    for found in separator.find_iter(text) {
        if max.is_some_and(|max| pieces.len() + 1 >= max) {
            break;
        }
        depth += text[scanned..found.start()].chars().map(depth_change).sum::<i32>();
        scanned = found.start();
        if depth <= 0 {
            pieces.push(&text[piece_start..found.start()]);
            piece_start = found.end();
        }
    }
    pieces.push(&text[piece_start..]);
    pieces
}

// -----------------------------------------------------------------------------
// Multi

/// The grammar of a multi-valued type: sequences, arrays, maps and records.
///
/// Text optionally starts with [`start`](Multi::start) and ends with
/// [`end`](Multi::end), which are required when [`strict`](Multi::strict).
/// The body is split by [`value_separator`](Multi::value_separator), then each
/// entry by [`key_separator`](Multi::key_separator) for keyed types.
/// Separators inside `[]`, `{}` or `()` do not split, so nested values keep
/// their own text.
#[derive(Clone, Debug)]
pub struct Multi {
    pub start: String,
    pub value_separator: Regex,
    pub key_separator: Option<Regex>,
    pub end: String,
    pub strict: bool,
}

impl Multi {
    /// Creates a non-strict grammar without a key separator.
    pub fn new(start: &str, value_separator: &str, end: &str) -> Result<Self, DecodeError> {
        Ok(Self {
            start: start.to_string(),
            value_separator: Regex::new(value_separator)?,
            key_separator: None,
            end: end.to_string(),
            strict: false,
        })
    }

    pub fn with_key_separator(mut self, key_separator: &str) -> Result<Self, DecodeError> {
        self.key_separator = Some(Regex::new(key_separator)?);
        Ok(self)
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the text between the delimiters, or all of it if they are absent.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Delimiters`] if strict and the delimiters are missing.
    pub fn body<'a>(&self, text: &'a str) -> Result<&'a str, DecodeError> {
        let trimmed = text.trim();
        let inner = trimmed
            .strip_prefix(self.start.as_str())
            .and_then(|rest| rest.strip_suffix(self.end.as_str()))
            .filter(|inner| is_balanced(inner));

        match inner {
            Some(inner) => Ok(inner.trim()),
            None if self.strict => Err(DecodeError::Delimiters {
                text: text.to_string(),
                start: self.start.clone(),
                end: self.end.clone(),
            }),
            None => Ok(trimmed),
        }
    }

    /// Splits `text` into its values. An empty body has no values.
    pub fn values<'a>(&self, text: &'a str, max: Option<usize>) -> Result<Vec<&'a str>, DecodeError> {
        let body = self.body(text)?;
        if body.is_empty() {
            return Ok(Vec::new());
        }
        Ok(split_top_level(body, &self.value_separator, max))
    }

    /// Splits `text` into key and value pairs.
    ///
    /// # Errors
    ///
    /// [`DecodeError::KeyValue`] if an entry has no key separator, or if
    /// this grammar has none.
    pub fn key_values<'a>(&self, text: &'a str) -> Result<Vec<(&'a str, &'a str)>, DecodeError> {
        let Some(separator) = &self.key_separator else {
            return Err(DecodeError::KeyValue { entry: text.to_string() });
        };

        let mut pairs = Vec::new();
        for entry in self.values(text, None)? {
            match split_top_level(entry, separator, Some(2)).as_slice() {
                [key, value] => pairs.push((key.trim(), value.trim())),
                _ => return Err(DecodeError::KeyValue { entry: entry.to_string() }),
            }
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::{Multi, is_balanced, split_top_level};
    use crate::DecodeError;
    use regex::Regex;

    fn list() -> Multi {
        Multi::new("[", r"\s*[\s,|]+\s*", "]").unwrap()
    }

    #[test]
    fn balance() {
        assert!(is_balanced("a [b {c}] (d)"));
        assert!(!is_balanced("1 2] [3"));
        assert!(!is_balanced("[1"));
    }

    #[test]
    fn split_skips_nested_separators() {
        let space = Regex::new(r"\s+").unwrap();
        assert_eq!(
            split_top_level("k:{X:1 Y:2} j:[1 2]", &space, None),
            ["k:{X:1 Y:2}", "j:[1 2]"]
        );
        assert!(split_top_level("a b", &space, Some(0)).is_empty());
        assert_eq!(split_top_level("", &space, None), [""]);
    }

    #[test]
    fn values() {
        let multi = list();
        assert_eq!(multi.values("1 true, false,0", None).unwrap(), ["1", "true", "false", "0"]);
        assert_eq!(multi.values("[a|b]", None).unwrap(), ["a", "b"]);
        assert_eq!(multi.values("[[1 2] [3]]", None).unwrap(), ["[1 2]", "[3]"]);
        assert_eq!(multi.values("[1 2] [3]", None).unwrap(), ["[1 2]", "[3]"]);
        assert_eq!(multi.values("3 4 5", Some(2)).unwrap(), ["3", "4 5"]);
        assert!(multi.values("[]", None).unwrap().is_empty());
        assert!(multi.values("  ", None).unwrap().is_empty());
    }

    #[test]
    fn strict_needs_delimiters() {
        let multi = list().with_strict(true);
        assert_eq!(multi.values("[a b]", None).unwrap(), ["a", "b"]);

        let err = multi.values("a b", None).unwrap_err();
        assert!(matches!(err, DecodeError::Delimiters { .. }));
    }

    #[test]
    fn key_values() {
        let multi = Multi::new("{", r"\s*[\s,|]+\s*", "}")
            .unwrap()
            .with_key_separator(":")
            .unwrap();
        assert_eq!(
            multi.key_values("{X:2 Y:5.4}").unwrap(),
            [("X", "2"), ("Y", "5.4")]
        );
        assert_eq!(
            multi.key_values("First:, Inner:{A:1 B:2}").unwrap(),
            [("First", ""), ("Inner", "{A:1 B:2}")]
        );

        let err = multi.key_values("{X}").unwrap_err();
        assert!(matches!(err, DecodeError::KeyValue { ref entry } if entry == "X"));
        assert!(list().key_values("a:1").is_err());
    }
}
