use crate::config::ParserConfig;
use crate::time::{format_timestamp, scan_tag_body};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

const LOG_TARGET: &str = "lrcview::parser";

/// Longest key accepted in an info tag like `[offset:500]`
const MAX_INFO_KEY_LEN: usize = 6;

/// Parsed LRC document: timed lines in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LrcDocument {
    pub lines: Vec<LrcLine>,
    /// Info tags, kept only with `ParserConfig::preserve_metadata`
    #[serde(default)]
    pub metadata: LrcMetadata,
    /// Lines without a time tag, kept only with `ParserConfig::preserve_untimed_lines`
    #[serde(default)]
    pub untimed: Vec<String>,
}

/// A single line of lyrics with its word-level timing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LrcLine {
    /// Start time in seconds
    pub time: f64,
    /// Timed words; empty for instrumental breaks or plain lines
    pub words: Vec<LrcWord>,
}

/// A word with its absolute start time in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LrcWord {
    pub time: f64,
    pub text: String,
}

/// Info tags from the file header, keyed by tag name as written and kept in
/// file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LrcMetadata(Vec<(String, String)>);

impl LrcMetadata {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert a tag. A repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    /// Tags in the order they first appeared
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("ti")
    }

    #[must_use]
    pub fn artist(&self) -> Option<&str> {
        self.get("ar")
    }

    #[must_use]
    pub fn album(&self) -> Option<&str> {
        self.get("al")
    }
}

impl LrcDocument {
    /// Parse LRC text with the default (word-level only) parser config
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self::parse_with(input, &ParserConfig::default())
    }

    /// Parse LRC text. Never fails: unrecognized lines and fragments are
    /// skipped, so the worst case is an empty document.
    #[must_use]
    pub fn parse_with(input: &str, config: &ParserConfig) -> Self {
        let mut document = Self::default();
        let mut dropped = 0usize;

        for (line_no, line) in split_lines(input).enumerate() {
            match classify_line(line) {
                LineKind::Timed { time, rest } => {
                    document.lines.push(LrcLine {
                        time,
                        words: WordTags::new(rest).collect(),
                    });
                }
                LineKind::Info { key, value } => {
                    if config.preserve_metadata && !value.is_empty() {
                        document.metadata.insert(key, value);
                    } else {
                        trace!(target: LOG_TARGET, "Skipping info tag [{}] on line {}", key, line_no + 1);
                    }
                }
                kind @ (LineKind::Malformed | LineKind::Untimed) => {
                    if config.preserve_untimed_lines {
                        document.untimed.push(config.trim.apply(line).to_string());
                    } else {
                        if matches!(kind, LineKind::Malformed) {
                            trace!(target: LOG_TARGET, "Dropping malformed line {}: {:?}", line_no + 1, line);
                        }
                        dropped += 1;
                    }
                }
            }
        }

        debug!(
            target: LOG_TARGET,
            "Parsed {} lines ({} words), dropped {}",
            document.lines.len(),
            document.word_count(),
            dropped
        );

        document
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of words across all lines
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(LrcLine::word_count).sum()
    }

    /// All words of all lines, in order
    pub fn words(&self) -> impl Iterator<Item = &LrcWord> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// A document with no timed lines means "no lyrics available"
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LrcLine {
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Words joined with single spaces
    #[must_use]
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for LrcWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", format_timestamp(self.time), self.text)
    }
}

impl fmt::Display for LrcLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", format_timestamp(self.time))?;
        for (i, word) in self.words.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{word}")?;
        }
        Ok(())
    }
}

/// Split on `\r\n`, `\n` or `\r`
fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    input.split('\n').flat_map(|line| {
        line.strip_suffix('\r')
            .unwrap_or(line)
            .split('\r')
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LineKind<'a> {
    /// `[mm:ss.fff]` followed by the rest of the line
    Timed { time: f64, rest: &'a str },
    /// `[key:value]`
    Info { key: &'a str, value: &'a str },
    /// Starts with `[` but matches neither tag grammar
    Malformed,
    /// Does not start with `[`
    Untimed,
}

fn classify_line(line: &str) -> LineKind<'_> {
    let Some(body) = line.strip_prefix('[') else {
        return LineKind::Untimed;
    };

    if let Some((time, rest)) = scan_line_tag(body) {
        return LineKind::Timed { time, rest };
    }

    if let Some((key, value)) = scan_info_tag(body) {
        return LineKind::Info { key, value };
    }

    LineKind::Malformed
}

/// `\s* mm:ss[.fff] \s* ]` after the opening bracket
fn scan_line_tag(body: &str) -> Option<(f64, &str)> {
    let body = body.trim_start();
    let (time, consumed) = scan_tag_body(body)?;
    let rest = body[consumed..].trim_start().strip_prefix(']')?;
    Some((time, rest))
}

/// `\s* key \s* : value ]` after the opening bracket, value trimmed
fn scan_info_tag(body: &str) -> Option<(&str, &str)> {
    let body = body.trim_start();
    let key_len = body
        .find(|c: char| !is_info_key_char(c))
        .unwrap_or(body.len());
    if key_len == 0 || key_len > MAX_INFO_KEY_LEN {
        return None;
    }

    let after_key = body[key_len..].trim_start().strip_prefix(':')?;
    let end = after_key.find(']')?;
    Some((&body[..key_len], after_key[..end].trim()))
}

const fn is_info_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Iterator over the inline `<mm:ss.fff>word` tags of a timed line.
///
/// Anything that is not a complete tag followed by a word is skipped.
#[derive(Debug, Clone)]
pub struct WordTags<'a> {
    rest: &'a str,
}

impl<'a> WordTags<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl Iterator for WordTags<'_> {
    type Item = LrcWord;

    fn next(&mut self) -> Option<LrcWord> {
        loop {
            let open = self.rest.find('<')?;
            let candidate = &self.rest[open + 1..];

            if let Some((word, consumed)) = scan_word_tag(candidate) {
                self.rest = &candidate[consumed..];
                return Some(word);
            }

            self.rest = candidate;
        }
    }
}

/// `mm:ss[.fff]> \s* word` after the opening angle bracket
fn scan_word_tag(input: &str) -> Option<(LrcWord, usize)> {
    let (time, body_len) = scan_tag_body(input)?;
    let word_start = input[body_len..].strip_prefix('>')?.trim_start();

    let len = word_len(word_start);
    if len == 0 {
        return None;
    }

    let consumed = input.len() - word_start.len() + len;
    let word = LrcWord {
        time,
        text: word_start[..len].to_string(),
    };
    Some((word, consumed))
}

/// Byte length of the `word(-word)*` run at the start of `s`
fn word_len(s: &str) -> usize {
    let mut end = 0;
    loop {
        let run: usize = s[end..]
            .chars()
            .take_while(|&c| is_word_letter(c))
            .map(char::len_utf8)
            .sum();
        if run == 0 {
            return end;
        }
        end += run;

        match s[end..].strip_prefix('-') {
            Some(next) if next.starts_with(is_word_letter) => end += 1,
            _ => return end,
        }
    }
}

fn is_word_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || is_cjk_ideograph(c)
}

const fn is_cjk_ideograph(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}'
            | '\u{2A700}'..='\u{2EBEF}'
            | '\u{30000}'..='\u{3134F}'
    )
}
