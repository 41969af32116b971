//! Header and plain-body tokenizer
//!
//! Splits a NetPBM byte stream into whitespace-delimited tokens. A `#`
//! starts a comment that runs to the end of the line; its text is
//! captured and never returned as a token.

/// A whitespace-delimited token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub bytes: &'a [u8],
}

impl Token<'_> {
    /// Lossy text of the token for error messages.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.bytes).into_owned()
    }

    /// Parse as an unsigned decimal number.
    ///
    /// Returns `None` if any byte is not an ASCII digit. Values that do not
    /// fit in a `u64` saturate.
    pub fn number(&self) -> Option<u64> {
        if self.bytes.is_empty() {
            return None;
        }
        self.bytes.iter().try_fold(0u64, |acc, &b| {
            b.is_ascii_digit()
                .then(|| acc.saturating_mul(10).saturating_add((b - b'0') as u64))
        })
    }

    /// Parse as a signed decimal number (a leading `-` or `+` is allowed).
    pub fn signed_number(&self) -> Option<i64> {
        let (negative, digits) = match self.bytes.first() {
            Some(b'-') => (true, &self.bytes[1..]),
            Some(b'+') => (false, &self.bytes[1..]),
            _ => (false, self.bytes),
        };
        let magnitude = Token { bytes: digits }.number()?;
        let magnitude = i64::try_from(magnitude).unwrap_or(i64::MAX);
        Some(if negative { -magnitude } else { magnitude })
    }
}

/// NetPBM whitespace: space, tab, CR, LF, VT, FF.
#[inline]
pub(crate) fn is_pnm_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

/// Token cursor over a byte slice that collects comments as it goes.
pub(crate) struct Tokenizer<'a> {
    data: &'a [u8],
    pos: usize,
    comments: Vec<String>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Tokenizer {
            data,
            pos: 0,
            comments: Vec::new(),
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Take the comments collected so far.
    pub fn into_comments(self) -> Vec<String> {
        self.comments
    }

    /// Return the next token, skipping whitespace and capturing comments.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        loop {
            while self.pos < self.data.len() && is_pnm_space(self.data[self.pos]) {
                self.pos += 1;
            }
            match self.data.get(self.pos) {
                None => return None,
                Some(b'#') => self.read_comment(),
                Some(_) => break,
            }
        }

        let start = self.pos;
        while self.pos < self.data.len()
            && !is_pnm_space(self.data[self.pos])
            && self.data[self.pos] != b'#'
        {
            self.pos += 1;
        }
        Some(Token {
            bytes: &self.data[start..self.pos],
        })
    }

    /// Consume the single whitespace byte that ends a binary header.
    ///
    /// Returns `false` if the next byte is missing or not whitespace.
    pub fn consume_header_terminator(&mut self) -> bool {
        match self.data.get(self.pos) {
            Some(&b) if is_pnm_space(b) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn read_comment(&mut self) {
        // Skip the '#'
        let start = self.pos + 1;
        let mut end = start;
        while end < self.data.len() && self.data[end] != b'\n' && self.data[end] != b'\r' {
            end += 1;
        }
        self.comments
            .push(String::from_utf8_lossy(&self.data[start..end]).into_owned());
        self.pos = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(data: &[u8]) -> (Vec<String>, Vec<String>) {
        let mut t = Tokenizer::new(data);
        let mut out = Vec::new();
        while let Some(tok) = t.next_token() {
            out.push(tok.text());
        }
        (out, t.into_comments())
    }

    #[test]
    fn test_split_on_whitespace() {
        let (toks, comments) = tokens(b"P2\n 3\t4\r\n255 ");
        assert_eq!(toks, vec!["P2", "3", "4", "255"]);
        assert!(comments.is_empty());
    }

    #[test]
    fn test_comments_are_captured_verbatim() {
        let (toks, comments) = tokens(b"P1\n# first line\n2#tail\n2\n#\n");
        assert_eq!(toks, vec!["P1", "2", "2"]);
        assert_eq!(comments, vec![" first line", "tail", ""]);
    }

    #[test]
    fn test_crlf_comment_terminator() {
        let (_, comments) = tokens(b"P1\r\n# dos\r\n1 1\r\n1\r\n");
        assert_eq!(comments, vec![" dos"]);
    }

    fn tok(bytes: &[u8]) -> Token<'_> {
        Token { bytes }
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(tok(b"255").number(), Some(255));
        assert_eq!(tok(b"2x").number(), None);
        assert_eq!(tok(b"-3").number(), None);
        assert_eq!(tok(b"-3").signed_number(), Some(-3));
        assert_eq!(tok(b"99999999999999999999999").number(), Some(u64::MAX));
    }

    #[test]
    fn test_header_terminator() {
        let mut t = Tokenizer::new(b"255\nABC");
        t.next_token();
        assert!(t.consume_header_terminator());
        assert_eq!(t.remaining(), b"ABC");

        let mut t = Tokenizer::new(b"255");
        t.next_token();
        assert!(!t.consume_header_terminator());
    }
}
