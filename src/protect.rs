//! Placeholder protection for ASCII characters in a combined translation
//! request.
//!
//! When a whole mixed-script field is sent through a single translation
//! call, the service may mangle the Latin substrings it was never meant to
//! touch. `protect` swaps every ASCII character for a placeholder before
//! transmission and `restore` puts the originals back afterwards.

/// Positional record of the characters removed by [`protect`].
///
/// Restoration consumes the recorded characters strictly in the order they
/// appeared in the original text; the placeholder count in the mapped text
/// equals the record length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMap {
    source_len: usize,
    replaced: Vec<char>,
}

impl CharacterMap {
    /// Number of characters in the protected source text.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// The recorded characters, in left-to-right source order.
    pub fn replaced(&self) -> &[char] {
        &self.replaced
    }
}

/// Replace every ASCII character with `map_char`, recording the originals.
///
/// An input character equal to `map_char` is recorded too (and left in
/// place when it is not ASCII itself) so that placeholder occurrences and
/// recorded characters stay in lockstep during restoration.
pub fn protect(text: &str, map_char: char) -> (String, CharacterMap) {
    let mut mapped = String::with_capacity(text.len());
    let mut replaced = Vec::new();
    let mut source_len = 0;

    for c in text.chars() {
        source_len += 1;
        if c.is_ascii() {
            replaced.push(c);
            mapped.push(map_char);
        } else if c == map_char {
            replaced.push(c);
            mapped.push(c);
        } else {
            mapped.push(c);
        }
    }

    (mapped, CharacterMap { source_len, replaced })
}

/// Substitute each `map_char` occurrence with the next recorded character.
///
/// Best effort by design: if the translated text carries fewer placeholders
/// than were recorded, the surplus records go unused; if it carries more,
/// the surplus placeholders are left in place. Either way no error is
/// raised, since the external service is allowed to have reshuffled text
/// around the protected positions.
pub fn restore(text: &str, map: &CharacterMap, map_char: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut queue = map.replaced.iter();

    for c in text.chars() {
        if c == map_char {
            match queue.next() {
                Some(&original) => out.push(original),
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP_CHAR: char = '`';

    #[test]
    fn protects_every_ascii_character() {
        let (mapped, map) = protect("Song01", MAP_CHAR);
        assert_eq!(mapped, "``````");
        assert_eq!(map.replaced(), &['S', 'o', 'n', 'g', '0', '1']);
        assert_eq!(map.source_len(), 6);
    }

    #[test]
    fn leaves_japanese_characters_alone() {
        let (mapped, map) = protect("雪Song降る", MAP_CHAR);
        assert_eq!(mapped, "雪````降る");
        assert_eq!(map.replaced(), &['S', 'o', 'n', 'g']);
    }

    #[test]
    fn placeholder_count_matches_record_length() {
        for input in ["Song01", "雪Song降る", "`back`tick`", "漢字だけ", ""] {
            let (mapped, map) = protect(input, MAP_CHAR);
            let placeholders = mapped.chars().filter(|&c| c == MAP_CHAR).count();
            assert_eq!(placeholders, map.replaced().len(), "{input}");
        }
    }

    #[test]
    fn untouched_round_trip_reproduces_the_input() {
        for input in ["Song01", "雪Song降る夜", "a`b", "ボカロP feat.初音ミク"] {
            let (mapped, map) = protect(input, MAP_CHAR);
            assert_eq!(restore(&mapped, &map, MAP_CHAR), input);
        }
    }

    #[test]
    fn map_char_in_input_is_recorded_for_consistency() {
        let (mapped, map) = protect("a`b", MAP_CHAR);
        assert_eq!(mapped, "```");
        assert_eq!(map.replaced(), &['a', '`', 'b']);
        assert_eq!(restore(&mapped, &map, MAP_CHAR), "a`b");
    }

    #[test]
    fn non_ascii_map_char_is_kept_in_place_but_recorded() {
        let (mapped, map) = protect("a■b", '■');
        assert_eq!(mapped, "■■■");
        assert_eq!(map.replaced(), &['a', '■', 'b']);
        assert_eq!(restore(&mapped, &map, '■'), "a■b");
    }

    #[test]
    fn missing_placeholders_truncate_recovery_silently() {
        let (_, map) = protect("abc", MAP_CHAR);
        // The service collapsed three placeholders into two; the third
        // record goes unused and no error is raised.
        assert_eq!(restore("``", &map, MAP_CHAR), "ab");
    }

    #[test]
    fn surplus_placeholders_are_left_in_place() {
        let (_, map) = protect("ab", MAP_CHAR);
        assert_eq!(restore("````", &map, MAP_CHAR), "ab``");
    }
}
