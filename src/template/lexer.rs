//! Low-level scanning over template source.
//!
//! The grammar is white-space sensitive and brace-delimited, so the scanner
//! works on raw byte offsets over the original source rather than a token
//! stream: terminator sets differ by position inside a field, and a single
//! space is itself a token (it introduces the conditional). The parser
//! drives one [`Scanner`] across the whole template, including every nested
//! sub-template, which keeps all spans relative to the one source string.

/// Characters that end the field name. Note that `<` and `>` are ordinary
/// name characters: `{ISO<100}` is a field named `ISO<100`, while
/// `{ISO < 100}` is a conditional on the field `ISO`; the space matters.
pub(crate) const NAME_TERMINATORS: &[char] = &[':', '.', '|', '[', ' ', '?', ',', '}', '{'];

/// Characters that end the subfield. `:` is absent on purpose so a subfield
/// can carry its own colon-separated argument (`{format:int:02d,…}`), and so
/// is `.`, which may appear inside a format precision (`{format:float:10.4f,…}`)
/// or a provider-interpreted dotted subfield. Dot-path navigation in the
/// core applies only after a bare field name.
pub(crate) const SUBFIELD_TERMINATORS: &[char] = &['{', '|', '[', ' ', '?', ',', '}'];

/// Characters that end a dot-path attribute.
pub(crate) const PATH_TERMINATORS: &[char] = &['{', ':', '.', '|', '[', ' ', '?', ',', '}'];

/// Characters that end a filter name.
pub(crate) const FILTER_TERMINATORS: &[char] = &['(', '|', '[', ' ', '?', ',', '}', '{', '.'];

/// True for characters that may follow the `+` of a delimiter prefix, i.e.
/// may start a field name. Deliberately narrower than "not a terminator":
/// a `+` inside (say) a format specification is never followed by one of
/// these, so it is not mistaken for the prefix marker.
pub(crate) fn is_name_start(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '%'
}

/// Cursor over template source with byte-offset position tracking.
pub(crate) struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Current byte offset.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Unconsumed remainder of the source.
    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Next character without consuming it.
    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the next character.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `c` if it is next.
    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `s` if the remaining input starts with it.
    pub(crate) fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume characters up to (not including) the first character in
    /// `terminators`, or to the end of input.
    pub(crate) fn take_until(&mut self, terminators: &[char]) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| terminators.contains(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Consume exactly `n` bytes (which must fall on a character boundary).
    pub(crate) fn take_bytes(&mut self, n: usize) -> &'a str {
        let taken = &self.rest()[..n];
        self.pos += n;
        taken
    }

    /// Probe for a delimiter prefix: the byte offset (relative to the
    /// current position) of the first `+` whose successor can start a field
    /// name. The probe never crosses a brace, so nested fields later in the
    /// field body cannot be swallowed into a delimiter.
    pub(crate) fn find_delim_plus(&self) -> Option<usize> {
        let rest = self.rest();
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '{' | '}' => return None,
                '+' => {
                    if let Some(&(_, next)) = chars.peek() {
                        if is_name_start(next) {
                            return Some(i);
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_until_stops_at_terminator() {
        let mut sc = Scanner::new("audio:artist}");
        assert_eq!(sc.take_until(NAME_TERMINATORS), "audio");
        assert_eq!(sc.peek(), Some(':'));
    }

    #[test]
    fn take_until_runs_to_end() {
        let mut sc = Scanner::new("plain");
        assert_eq!(sc.take_until(NAME_TERMINATORS), "plain");
        assert!(sc.peek().is_none());
    }

    #[test]
    fn delim_probe_finds_qualified_plus() {
        assert_eq!(Scanner::new(", +foo}").find_delim_plus(), Some(2));
        assert_eq!(Scanner::new("+foo}").find_delim_plus(), Some(0));
        assert_eq!(Scanner::new("%myvar+foo}").find_delim_plus(), Some(6));
    }

    #[test]
    fn delim_probe_skips_unqualified_plus() {
        // `+` followed by `)` cannot start a name.
        assert_eq!(Scanner::new("a|append(+)}").find_delim_plus(), None);
    }

    #[test]
    fn delim_probe_stops_at_braces() {
        assert_eq!(Scanner::new("baz,{a+b}}").find_delim_plus(), None);
    }

    #[test]
    fn multibyte_input_advances_by_char() {
        let mut sc = Scanner::new("é{");
        assert_eq!(sc.bump(), Some('é'));
        assert_eq!(sc.pos(), 'é'.len_utf8());
        assert_eq!(sc.peek(), Some('{'));
    }
}
