//! Script-aware segmentation of mixed Japanese/Latin text.
//!
//! A string is split into maximal runs sharing one script classification.
//! Hiragana and Kanji are grouped together because both get a phonetic
//! rendering; Katakana is kept separate because loanwords get a translation
//! instead. Everything else, including ASCII, digits, punctuation and
//! whitespace, counts as Latin and passes through untouched.

/// Script classification of a single character run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    /// ASCII, digits, punctuation, whitespace, and any other script.
    Latin,
    /// Hiragana or Kanji, rendered phonetically.
    KanaKanji,
    /// Katakana loanwords, translated back to the source language.
    Katakana,
}

/// A maximal run of characters sharing one script classification.
///
/// `prefix` is the inter-token spacing (empty or a single space) decided
/// once when the token boundary is detected. The first token of a string
/// always has an empty prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    pub class: ScriptClass,
    pub text: String,
    pub prefix: String,
}

pub fn is_hiragana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}')
}

pub fn is_katakana(c: char) -> bool {
    matches!(c, '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9D}')
}

pub fn is_kanji(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

/// Classify a single character. Hiragana/Kanji take precedence over
/// Katakana; everything unmatched falls into Latin.
pub fn classify(c: char) -> ScriptClass {
    if is_hiragana(c) || is_kanji(c) {
        ScriptClass::KanaKanji
    } else if is_katakana(c) {
        ScriptClass::Katakana
    } else {
        ScriptClass::Latin
    }
}

// Unicode general category P, approximated for the scripts seen in track
// titles: the ASCII punctuation subset ('~' is a math symbol, not
// punctuation) plus the CJK and fullwidth punctuation blocks.
fn is_punctuation(c: char) -> bool {
    if c.is_ascii() {
        matches!(
            c,
            '!' | '"'
                | '#'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '?'
                | '@'
                | '['
                | '\\'
                | ']'
                | '_'
                | '{'
                | '}'
        )
    } else {
        matches!(
            c,
            '\u{3001}'..='\u{303F}'
                | '\u{FF01}'..='\u{FF0F}'
                | '\u{FF1A}'..='\u{FF1F}'
                | '\u{FF3B}'..='\u{FF3F}'
                | '\u{FF5B}'..='\u{FF65}'
        )
    }
}

/// Spacing inserted before a token that starts a new script run.
///
/// Latin runs usually carry their own spacing and punctuation, so crossing
/// into or out of Latin only inserts a space when the boundary characters
/// do not already provide separation. Kana/Kanji and Katakana runs never
/// carry Latin-style spacing, so crossing between those two always spaces.
pub fn token_prefix(
    prev: ScriptClass,
    curr: ScriptClass,
    prev_last: char,
    curr_first: char,
) -> String {
    use ScriptClass::*;

    let spaced = match (prev, curr) {
        (KanaKanji, Latin) => {
            !curr_first.is_whitespace()
                && !is_punctuation(curr_first)
                && curr_first != '~'
                && curr_first != '-'
        }
        (Katakana, Latin) => !curr_first.is_whitespace() && !is_punctuation(curr_first),
        (Latin, KanaKanji) => {
            !prev_last.is_whitespace() && prev_last != '~' && prev_last != '-'
        }
        (Katakana, KanaKanji) => true,
        (Latin, Katakana) => !prev_last.is_whitespace(),
        (KanaKanji, Katakana) => true,
        _ => false,
    };

    if spaced { " ".to_string() } else { String::new() }
}

/// Split a string into sequential script-homogeneous tokens.
///
/// eg. "Cake 01. ヴァンパイア雪降る夜"
/// => ["Cake 01. ", "ヴァンパイア", "雪降る夜"]
///
/// Concatenating the token texts in order reproduces the input exactly;
/// prefixes are derived separators, not part of the round trip.
pub fn segment(text: &str) -> Vec<TextToken> {
    let mut tokens: Vec<TextToken> = Vec::new();

    // Arbitrary seed class; the first token never gets a prefix because
    // the accumulator is still empty when the first character arrives.
    let mut current = TextToken {
        class: ScriptClass::Latin,
        text: String::new(),
        prefix: String::new(),
    };

    for c in text.chars() {
        let class = classify(c);

        if class == current.class {
            current.text.push(c);
            continue;
        }

        let prefix = match current.text.chars().last() {
            Some(prev_last) => token_prefix(current.class, class, prev_last, c),
            None => String::new(),
        };

        if !current.text.is_empty() {
            tokens.push(current);
        }

        current = TextToken {
            class,
            text: c.to_string(),
            prefix,
        };
    }

    if !current.text.is_empty() {
        tokens.push(current);
    }

    tokens
}
