//! Raw symbol scanner
//!
//! Splits source text into symbols without assigning meaning to them.
//! Classification into tokens happens in the analyzer, which may also ask
//! the scanner for the rest of a line or the remainder of a quoted string.

use crate::utils::{Position, Span, Spanned};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Symbol-at-a-time cursor over source text
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> Scanner<'a> {
    /// Start scanning `source`, skipping a leading byte order mark
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Self {
            source,
            offset: 0,
            position: Position::start(),
        };
        if source.starts_with(BYTE_ORDER_MARK) {
            scanner.offset = BYTE_ORDER_MARK.len_utf8();
            scanner.position = Position::new(scanner.offset, 1, 1);
        }
        scanner
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Consume `len` bytes and return them with their span
    fn take(&mut self, len: usize) -> Spanned<&'a str> {
        let text = &self.source[self.offset..self.offset + len];
        let start = self.position;
        self.offset += len;
        self.position = start.advance_str(text);
        Spanned::new(text, Span::new(start, self.position))
    }

    /// Next raw symbol, `None` at end of input.
    ///
    /// Symbols are line breaks (`\n`, `\r`, `\r\n`), runs of one whitespace
    /// character, runs of `-` or `/` (or either followed by `=`), the
    /// one- and two-character operators, quotes and brackets, words over
    /// `[A-Za-z0-9_.]` and non-ASCII text up to the end of the line.
    pub fn next_symbol(&mut self) -> Option<Spanned<&'a str>> {
        let rest = self.rest();
        let mut chars = rest.chars();
        let first = chars.next()?;
        let second = chars.next();

        let len = if !first.is_ascii() {
            line_length(rest)
        } else {
            match first {
                '\r' if second == Some('\n') => 2,
                '\r' | '\n' => 1,
                ' ' | '\t' => run_length(rest, first),
                '-' | '/' if second == Some('=') => 2,
                '-' | '/' => run_length(rest, first),
                '&' | '|' | '!' | '~' | '=' if second == Some('=') => 2,
                '>' | '<' | '+' if second == Some('=') || second == Some(first) => 2,
                '.' if second == Some('.') => 2,
                c if c.is_ascii_digit() => number_length(rest),
                c if is_word_char(c) => word_length(rest),
                _ => 1,
            }
        };

        Some(self.take(len))
    }

    /// Text from the current position to the end of the line, terminator excluded
    pub fn rest_of_line(&mut self) -> Spanned<&'a str> {
        let len = line_length(self.rest());
        self.take(len)
    }

    /// Remainder of a string literal whose opening `quote` was already consumed.
    ///
    /// Double-quoted strings honor backslash escapes. Returns `None` when the
    /// input ends before the closing quote.
    pub fn string_tail(&mut self, quote: char) -> Option<Spanned<&'a str>> {
        let escapes = quote == '"';
        let mut escaped = false;

        for (index, ch) in self.rest().char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            if escapes && ch == '\\' {
                escaped = true;
                continue;
            }
            if ch == quote {
                return Some(self.take(index + ch.len_utf8()));
            }
        }

        None
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Spanned<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_symbol()
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn line_length(text: &str) -> usize {
    text.find(['\n', '\r']).unwrap_or(text.len())
}

fn run_length(text: &str, ch: char) -> usize {
    text.find(|c| c != ch).unwrap_or(text.len())
}

fn word_length(text: &str) -> usize {
    text.find(|c: char| !(is_word_char(c) || c == '.'))
        .unwrap_or(text.len())
}

/// Words starting with a digit may also hold exponent signs, date dashes
/// and clock colons
fn number_length(text: &str) -> usize {
    let mut end = 0;
    for (index, ch) in text.char_indices() {
        let so_far = &text[..index];
        let continues = match ch {
            c if is_word_char(c) || c == '.' => true,
            ':' => so_far.contains('T'),
            '+' | '-' => {
                (so_far.ends_with(['e', 'E']) && !so_far.starts_with("0x"))
                    || is_date_prefix(so_far)
                    || so_far.contains('T')
            }
            _ => false,
        };
        if !continues {
            break;
        }
        end = index + ch.len_utf8();
    }
    end
}

/// `YYYY` or `YYYY-MM`
fn is_date_prefix(text: &str) -> bool {
    let digits = |part: &str, len: usize| {
        part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
    };
    match text.split_once('-') {
        None => digits(text, 4),
        Some((year, month)) => digits(year, 4) && digits(month, 2),
    }
}
