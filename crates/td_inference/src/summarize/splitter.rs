use td_core::{DigestConfig, Sentence};

/// Boundary-heuristic sentence splitter.
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    min_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Heuristic,
    PeriodSpace,
}

impl SentenceSplitter {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    pub fn from_config(config: &DigestConfig) -> Self {
        Self::new(config.min_sentence_chars)
    }

    /// Splits `text` lazily. Texts without a single heuristic boundary are
    /// split on `". "` instead.
    pub fn split<'a>(&self, text: &'a str) -> Sentences<'a> {
        let mode = if heuristic_boundary(text).is_some() {
            Mode::Heuristic
        } else {
            Mode::PeriodSpace
        };
        Sentences {
            text,
            cursor: 0,
            mode,
            min_chars: self.min_chars,
            emitted: 0,
        }
    }
}

impl Default for SentenceSplitter {
    fn default() -> Self {
        Self::new(DigestConfig::default().min_sentence_chars)
    }
}

/// Sentences of one text, in source order. Consumed once.
#[derive(Debug)]
pub struct Sentences<'a> {
    text: &'a str,
    cursor: usize,
    mode: Mode,
    min_chars: usize,
    emitted: usize,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = Sentence;

    fn next(&mut self) -> Option<Sentence> {
        while self.cursor < self.text.len() {
            let rest = &self.text[self.cursor..];
            let (segment, advance) = match self.mode {
                Mode::Heuristic => match heuristic_boundary(rest) {
                    Some(end) => (&rest[..end], end),
                    None => (rest, rest.len()),
                },
                Mode::PeriodSpace => match rest.find(". ") {
                    Some(dot) => (&rest[..dot + 1], dot + 2),
                    None => (rest, rest.len()),
                },
            };
            self.cursor += advance;

            let segment = segment.trim();
            if segment.chars().count() >= self.min_chars {
                let sentence = Sentence {
                    text: segment.to_string(),
                    position: self.emitted,
                };
                self.emitted += 1;
                return Some(sentence);
            }
        }
        None
    }
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | '”' | '’' | ')' | ']')
}

fn is_opening(c: char) -> bool {
    matches!(c, '"' | '\'' | '“' | '‘' | '(' | '[')
}

/// Byte offset just past the first sentence terminator in `text` that is
/// followed by whitespace and an uppercase letter, digit or opening quote.
fn heuristic_boundary(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !is_closing(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }

        let tail = &text[end..];
        let rest = tail.trim_start();
        if rest.len() == tail.len() {
            continue;
        }
        if let Some(first) = rest.chars().next() {
            if first.is_uppercase() || first.is_ascii_digit() || is_opening(first) {
                return Some(end);
            }
        }
    }
    None
}
