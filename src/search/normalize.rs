// Query matching
// Case- and accent-insensitive substring search that reports matches as byte
// ranges into the original, unnormalized text.

use std::ops::Range;
use unicode_normalization::UnicodeNormalization;

/// How text is folded before comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folding {
    /// Canonical decomposition, combining marks removed, then lowercase
    StripDiacritics,
    /// Lowercase only
    Lowercase,
}

/// A compiled search query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    query: Vec<char>,
    folding: Folding,
}

fn is_combining_mark(ch: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&ch)
}

fn fold_char(ch: char, folding: Folding, out: &mut Vec<char>) {
    match folding {
        Folding::StripDiacritics => {
            for decomposed in std::iter::once(ch).nfd() {
                if !is_combining_mark(decomposed) {
                    out.extend(decomposed.to_lowercase());
                }
            }
        }
        Folding::Lowercase => out.extend(ch.to_lowercase()),
    }
}

/// Fold a whole string for comparison
pub fn normalize_for_match(text: &str, folding: Folding) -> String {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        fold_char(ch, folding, &mut out);
    }
    out.into_iter().collect()
}

impl Matcher {
    /// Compile `query`. Surrounding whitespace is ignored; a blank query
    /// yields `None`.
    ///
    /// A query that folds to nothing (only combining marks) falls back to
    /// lowercase matching so it can still find its literal marks.
    pub fn new(query: &str) -> Option<Self> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let folded = normalize_for_match(query, Folding::StripDiacritics);
        if !folded.is_empty() {
            return Some(Matcher {
                query: folded.chars().collect(),
                folding: Folding::StripDiacritics,
            });
        }

        Some(Matcher {
            query: normalize_for_match(query, Folding::Lowercase).chars().collect(),
            folding: Folding::Lowercase,
        })
    }

    pub fn folding(&self) -> Folding {
        self.folding
    }

    pub fn is_match(&self, text: &str) -> bool {
        !self.find_all(text).is_empty()
    }

    /// All non-overlapping matches in `text`, left to right, as byte ranges.
    ///
    /// A match always covers whole characters of the original text,
    /// including combining marks that directly follow its last character.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();
        // (folded char, index into `spans`)
        let mut folded: Vec<(char, usize)> = Vec::with_capacity(text.len());
        let mut emitted: Vec<usize> = Vec::new();
        let mut buf = Vec::new();

        for (byte, ch) in text.char_indices() {
            buf.clear();
            fold_char(ch, self.folding, &mut buf);
            let index = spans.len();
            spans.push(byte..byte + ch.len_utf8());
            emitted.push(buf.len());
            folded.extend(buf.iter().map(|&c| (c, index)));
        }

        let n = self.query.len();
        let mut matches = Vec::new();
        let mut i = 0;
        while i + n <= folded.len() {
            let hit = folded[i..i + n]
                .iter()
                .map(|(c, _)| c)
                .eq(self.query.iter());
            if !hit {
                i += 1;
                continue;
            }

            let first = folded[i].1;
            let mut last = folded[i + n - 1].1;
            while last + 1 < spans.len() && emitted[last + 1] == 0 {
                last += 1;
            }
            matches.push(spans[first].start..spans[last].end);

            i += n;
            while i < folded.len() && folded[i].1 <= last {
                i += 1;
            }
        }
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query() {
        assert!(Matcher::new("").is_none());
        assert!(Matcher::new("   ").is_none());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize_for_match("Crème Brûlée", Folding::StripDiacritics),
            "creme brulee"
        );
        assert_eq!(normalize_for_match("Crème", Folding::Lowercase), "crème");
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = Matcher::new("CAT").unwrap();
        assert_eq!(matcher.find_all("a cat, a Cat"), vec![2..5, 9..12]);
    }

    #[test]
    fn test_accent_insensitive_maps_to_original_bytes() {
        let matcher = Matcher::new("cafe").unwrap();
        let text = "Un Café";
        let found = matcher.find_all(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].clone()], "Café");
    }

    #[test]
    fn test_accented_query_matches_plain_text() {
        let matcher = Matcher::new("café").unwrap();
        assert!(matcher.is_match("CAFE"));
    }

    #[test]
    fn test_decomposed_input_keeps_combining_mark() {
        let matcher = Matcher::new("cafe").unwrap();
        let text = "cafe\u{301}!";
        let found = matcher.find_all(text);
        assert_eq!(&text[found[0].clone()], "cafe\u{301}");
    }

    #[test]
    fn test_matches_do_not_overlap() {
        let matcher = Matcher::new("aa").unwrap();
        assert_eq!(matcher.find_all("aaaa"), vec![0..2, 2..4]);
        assert_eq!(matcher.find_all("aaa"), vec![0..2]);
    }

    #[test]
    fn test_query_is_trimmed() {
        let matcher = Matcher::new("  wor ").unwrap();
        assert_eq!(matcher.find_all("hello world"), vec![6..9]);
    }

    #[test]
    fn test_combining_mark_query_falls_back_to_lowercase() {
        let matcher = Matcher::new("\u{301}").unwrap();
        assert_eq!(matcher.folding(), Folding::Lowercase);
        assert_eq!(matcher.find_all("e\u{301}"), vec![1..3]);
    }
}
