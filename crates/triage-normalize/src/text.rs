//! Clause splitting, tokenization, and onset extraction.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::lexicon::Lexicon;

static SEGMENT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,.;!?\n]+").expect("segment pattern is valid"));
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’]\p{L}+)?").expect("word pattern is valid")
});
static ONSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(minute|min|hour|hr|day|week|month)s?\b",
    )
    .expect("onset pattern is valid")
});

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// A lowercase word and its byte span in the source segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// A run of tokens that negation and severity markers cannot cross.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause<'a> {
    /// The clause as the user wrote it, trimmed.
    pub text: &'a str,
    pub tokens: Vec<Token>,
}

impl Clause<'_> {
    /// The tokens `[from, to)` joined by single spaces.
    pub fn span(&self, from: usize, to: usize) -> String {
        self.tokens[from..to]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split `input` at punctuation and at clause-break words.
///
/// Break words are dropped. Clauses without any word are skipped.
pub fn clauses<'a>(input: &'a str, lexicon: &Lexicon) -> Vec<Clause<'a>> {
    let mut out = Vec::new();
    for segment in SEGMENT_BREAK.split(input) {
        let mut current: Vec<Token> = Vec::new();
        for m in WORD.find_iter(segment) {
            let text = m.as_str().to_lowercase().replace('’', "'");
            if lexicon.is_clause_break(&text) {
                push_clause(&mut out, segment, std::mem::take(&mut current));
                continue;
            }
            current.push(Token {
                text,
                start: m.start(),
                end: m.end(),
            });
        }
        push_clause(&mut out, segment, current);
    }
    out
}

fn push_clause<'a>(out: &mut Vec<Clause<'a>>, segment: &'a str, tokens: Vec<Token>) {
    if let (Some(first), Some(last)) = (tokens.first(), tokens.last()) {
        let text = &segment[first.start..last.end];
        out.push(Clause { text, tokens });
    }
}

/// "3 days", "an hour", "two weeks" → how long ago the symptom began.
pub fn parse_onset(text: &str) -> Option<Duration> {
    let caps = ONSET.captures(text)?;
    let count = match caps.get(1)?.as_str().to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse::<u64>().ok()?,
    };
    let unit = match caps.get(2)?.as_str().to_lowercase().as_str() {
        "minute" | "min" => MINUTE,
        "hour" | "hr" => HOUR,
        "day" => DAY,
        "week" => 7 * DAY,
        _ => 30 * DAY,
    };
    Some(Duration::from_secs(count.saturating_mul(unit)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        clauses(input, &Lexicon::default())
            .into_iter()
            .map(|c| c.text.to_string())
            .collect()
    }

    #[test]
    fn splits_on_punctuation_and_contrast() {
        assert_eq!(
            texts("No fever, bad headache. Cough but NO rash!"),
            vec!["No fever", "bad headache", "Cough", "NO rash"]
        );
    }

    #[test]
    fn skips_empty_clauses() {
        assert_eq!(texts(" ,, . ; "), Vec::<String>::new());
        assert_eq!(texts("however"), Vec::<String>::new());
    }

    #[test]
    fn tokens_are_lowercase_and_keep_apostrophes() {
        let lexicon = Lexicon::default();
        let clauses = clauses("I Can’t Breathe", &lexicon);
        let tokens: Vec<&str> = clauses[0].tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(tokens, vec!["i", "can't", "breathe"]);
        assert_eq!(clauses[0].span(1, 3), "can't breathe");
    }

    #[test]
    fn onset_units() {
        assert_eq!(parse_onset("for 3 days"), Some(Duration::from_secs(3 * DAY)));
        assert_eq!(parse_onset("since an hour"), Some(Duration::from_secs(HOUR)));
        assert_eq!(parse_onset("two weeks ago"), Some(Duration::from_secs(14 * DAY)));
        assert_eq!(parse_onset("20 MINUTES"), Some(Duration::from_secs(20 * MINUTE)));
        assert_eq!(parse_onset("1 month"), Some(Duration::from_secs(30 * DAY)));
        assert_eq!(parse_onset("bad headache"), None);
    }
}
