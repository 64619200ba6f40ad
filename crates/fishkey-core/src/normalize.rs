//! Text normalization for catalog descriptions.
//!
//! Descriptions are uppercased and split into tokens. Punctuation splits
//! tokens except where it carries meaning: `P&D`, `16/20`, `5-7`, `1.5`,
//! `U/10` and `3-4#` survive as single tokens. Apostrophes vanish without
//! splitting so `GORTON'S` reads as `GORTONS`.

use std::collections::HashSet;

use serde::Serialize;

const MIN_SMASHED_LEN: usize = 6;
const MIN_PIECE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedText {
    pub text: String,
    pub tokens: Vec<String>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Words the smashed-code splitter must leave alone plus the code aliases it
/// may split a token into.
#[derive(Debug, Clone, Default)]
pub struct SplitVocabulary {
    known: HashSet<String>,
    pieces: HashSet<String>,
}

impl SplitVocabulary {
    pub fn insert_known(&mut self, word: &str) {
        self.known.insert(word.to_string());
    }

    pub fn insert_piece(&mut self, piece: &str) {
        if piece.chars().count() >= MIN_PIECE_LEN && piece.chars().all(|c| c.is_ascii_alphabetic())
        {
            self.pieces.insert(piece.to_string());
        }
        self.known.insert(piece.to_string());
    }

    pub fn is_known(&self, word: &str) -> bool {
        self.known.contains(word)
    }
}

pub fn normalize(raw: &str, vocabulary: &SplitVocabulary) -> NormalizedText {
    let mut tokens = Vec::new();
    for token in tokenize(raw) {
        match split_smashed(&token, vocabulary) {
            Some(pieces) => tokens.extend(pieces),
            None => tokens.push(token),
        }
    }
    NormalizedText {
        text: tokens.join(" "),
        tokens,
    }
}

pub fn tokenize(raw: &str) -> Vec<String> {
    let chars = raw.to_uppercase().chars().collect::<Vec<char>>();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (index, &c) in chars.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
            continue;
        }
        if c == '\'' || c == '\u{2019}' {
            continue;
        }

        let previous = current.chars().last();
        let next = chars.get(index + 1).copied();
        if keeps_joiner(c, &current, previous, next) {
            current.push(c);
            continue;
        }

        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn keeps_joiner(c: char, current: &str, previous: Option<char>, next: Option<char>) -> bool {
    let previous_alnum = previous.is_some_and(char::is_alphanumeric);
    let previous_digit = previous.is_some_and(|p| p.is_ascii_digit());
    let next_alnum = next.is_some_and(char::is_alphanumeric);
    let next_digit = next.is_some_and(|n| n.is_ascii_digit());

    match c {
        '&' => previous_alnum && next_alnum,
        '/' | '-' => (previous_digit && next_digit) || (current == "U" && next_digit),
        '.' => previous_digit && next_digit,
        '#' => previous_digit,
        _ => false,
    }
}

/// Splits a run-together code token such as `SKONIVP` into `SKON IVP` when
/// it segments completely into known code aliases.
fn split_smashed(token: &str, vocabulary: &SplitVocabulary) -> Option<Vec<String>> {
    if token.len() < MIN_SMASHED_LEN
        || !token.chars().all(|c| c.is_ascii_alphabetic())
        || vocabulary.is_known(token)
    {
        return None;
    }

    let n = token.len();
    // best[i] = fewest pieces covering token[..i], with the cut that produced it.
    let mut best: Vec<Option<(usize, usize)>> = vec![None; n + 1];
    best[0] = Some((0, 0));
    for end in MIN_PIECE_LEN..=n {
        for start in 0..=end - MIN_PIECE_LEN {
            let Some((count, _)) = best[start] else {
                continue;
            };
            if !vocabulary.pieces.contains(&token[start..end]) {
                continue;
            }
            let candidate = count + 1;
            if best[end].is_none_or(|(existing, _)| candidate < existing) {
                best[end] = Some((candidate, start));
            }
        }
    }

    let (count, _) = best[n]?;
    if count < 2 {
        return None;
    }

    let mut pieces = Vec::with_capacity(count);
    let mut end = n;
    while end > 0 {
        let (_, start) = best[end]?;
        pieces.push(token[start..end].to_string());
        end = start;
    }
    pieces.reverse();
    Some(pieces)
}

/// Positions where `needle` occurs as a whole-token sequence.
pub fn find_all<'a>(
    tokens: &'a [String],
    needle: &'a [String],
) -> impl Iterator<Item = usize> + 'a {
    let last_start = (tokens.len() + 1).saturating_sub(needle.len().max(1));
    (0..last_start).filter(move |&start| {
        !needle.is_empty()
            && tokens[start..start + needle.len()]
                .iter()
                .zip(needle)
                .all(|(token, word)| token == word)
    })
}

pub fn find_first(tokens: &[String], needle: &[String]) -> Option<usize> {
    find_all(tokens, needle).next()
}

pub fn contains(tokens: &[String], needle: &[String]) -> bool {
    find_first(tokens, needle).is_some()
}
