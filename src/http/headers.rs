use std::collections::HashMap;

use crate::http::parser::{ParseError, Parsed};

const CRLF: &[u8] = b"\r\n";

/// Punctuation allowed in a header name besides ASCII letters and digits.
const TOKEN_PUNCTUATION: &[u8] = b"!#$%&'*+-.^_`|~";

/// Case-insensitive collection of header fields.
///
/// Names are stored lower-cased. Setting a name that is already present
/// appends the new value to the stored one, separated by a bare comma, so
/// repeated header lines fold into a single value:
///
/// ```
/// # use rawhttp::http::headers::HeaderMap;
/// let mut headers = HeaderMap::new();
/// headers.set("Host", "localhost:1234");
/// headers.set("host", "localhost:5678");
/// assert_eq!(headers.get("HOST"), Some("localhost:1234,localhost:5678"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: HashMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `name`, folding it into any existing value.
    pub fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.fields.get_mut(&name) {
            Some(existing) => {
                existing.push(',');
                existing.push_str(value);
            }
            None => {
                self.fields.insert(name, value.to_string());
            }
        }
    }

    /// Looks up a header by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Iterates over `(name, value)` pairs. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes at most one header line from the front of `data`.
    ///
    /// Returns [`Parsed::NeedMoreInput`] when no full line is buffered yet,
    /// [`Parsed::Terminal`] for the blank line closing the header block and
    /// [`Parsed::Progress`] after a field line was applied. On error nothing
    /// is consumed and the map is left untouched.
    pub fn parse(&mut self, data: &[u8]) -> Result<Parsed, ParseError> {
        let Some(line_end) = find_crlf(data) else {
            return Ok(Parsed::NeedMoreInput);
        };
        if line_end == 0 {
            return Ok(Parsed::Terminal(CRLF.len()));
        }

        let line = &data[..line_end];
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            return Err(ParseError::MalformedHeader(
                String::from_utf8_lossy(line).into_owned(),
            ));
        };

        let (name, value) = (&line[..colon], &line[colon + 1..]);
        if !is_valid_token(name) {
            return Err(ParseError::InvalidHeaderToken(
                String::from_utf8_lossy(name).into_owned(),
            ));
        }
        // token bytes are ASCII, borrowed as-is
        let name = String::from_utf8_lossy(name);

        // values are opaque bytes; non-UTF-8 octets are stored lossily
        for segment in value
            .split(|&b| b == b';')
            .map(<[u8]>::trim_ascii)
            .filter(|s| !s.is_empty())
        {
            self.set(&name, &String::from_utf8_lossy(segment));
        }

        Ok(Parsed::Progress(line_end + CRLF.len()))
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || TOKEN_PUNCTUATION.contains(&b)
}

fn is_valid_token(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().copied().all(is_token_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_chars() {
        assert!(is_valid_token(b"Content-Type"));
        assert!(is_valid_token(b"x~weird|name^"));
        assert!(!is_valid_token(b""));
        assert!(!is_valid_token(b"Host "));
        assert!(!is_valid_token(b"a/b"));
        assert!(!is_valid_token("H©st".as_bytes()));
    }

    #[test]
    fn value_segments_fold_in_order() {
        let mut headers = HeaderMap::new();
        let data = b"Accept: text/html; ; application/json ;\r\n";
        assert_eq!(headers.parse(data).unwrap(), Parsed::Progress(data.len()));
        assert_eq!(headers.get("accept"), Some("text/html,application/json"));
    }

    #[test]
    fn non_utf8_value_is_kept() {
        let mut headers = HeaderMap::new();
        let data = b"X-Name: caf\xe9\r\n\r\n";
        assert_eq!(headers.parse(data).unwrap(), Parsed::Progress(14));
        assert_eq!(headers.get("x-name"), Some("caf\u{fffd}"));
    }

    #[test]
    fn empty_value_sets_nothing() {
        let mut headers = HeaderMap::new();
        assert_eq!(headers.parse(b"X-Empty:   \r\n").unwrap(), Parsed::Progress(13));
        assert_eq!(headers.get("x-empty"), None);
        assert!(headers.is_empty());
    }
}
