//! Rack-constrained anagram search over a compiled graph.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::errors::{Error, Result};

use super::builder::ROOT;
use super::graph::Dawg;

/// Default wildcard sentinel for anagram racks.
pub const DEFAULT_BLANK: u8 = b'?';

impl Dawg {
    /// Enumerates every dictionary word of exactly `word_length` letters
    /// that can be assembled from `rack`, honoring positional constraints.
    ///
    /// `rack` is an unordered multiset of letters; each rack letter is
    /// spent at most once per returned word. A `blank` byte in the rack
    /// (conventionally [`DEFAULT_BLANK`], `?`) stands in for any letter
    /// the graph offers. `fixed` pins positions to letters that are part
    /// of the word but consume nothing from the rack, like the board tiles
    /// already in play. Words consisting only of fixed letters are not
    /// reported: a result must place at least one rack letter.
    ///
    /// Rack and fixed letters are folded to ASCII lowercase. The returned
    /// set is empty when nothing fits; that is not an error.
    ///
    /// # Errors
    ///
    /// Fails on malformed arguments only: a zero `word_length`, a fixed
    /// position at or beyond `word_length`, or the same position pinned
    /// twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use dawglex::{Builder, DEFAULT_BLANK};
    ///
    /// let mut builder = Builder::new();
    /// for word in ["act", "cat", "cot"] {
    ///     builder.insert(word).unwrap();
    /// }
    /// let dawg = builder.build();
    ///
    /// let found = dawg.anagrams(b"tac", 3, &[], DEFAULT_BLANK).unwrap();
    /// let found: Vec<&str> = found.iter().map(String::as_str).collect();
    /// assert_eq!(found, ["act", "cat"]);
    /// ```
    pub fn anagrams(
        &self,
        rack: &[u8],
        word_length: usize,
        fixed: &[(usize, u8)],
        blank: u8,
    ) -> Result<BTreeSet<String>> {
        if word_length == 0 {
            return Err(Error::ZeroLength);
        }
        let mut fixed_map = HashMap::with_capacity(fixed.len());
        for &(position, letter) in fixed {
            if position >= word_length {
                return Err(Error::FixedOutOfRange {
                    position,
                    word_length,
                });
            }
            if fixed_map
                .insert(position, letter.to_ascii_lowercase())
                .is_some()
            {
                return Err(Error::DuplicateFixed(position));
            }
        }

        let mut counts = [0u32; 256];
        for &letter in rack {
            counts[letter.to_ascii_lowercase() as usize] += 1;
        }

        let mut search = RackSearch {
            dawg: self,
            word_length,
            fixed_total: fixed_map.len(),
            blank,
            rack: counts,
            fixed: fixed_map,
            prefix: Vec::with_capacity(word_length),
            results: BTreeSet::new(),
        };
        search.descend(ROOT);
        Ok(search.results)
    }
}

/// Mutable traversal state for one anagram query.
///
/// Every mutation along a branch is undone on the way back, so sibling
/// branches always see the original rack, prefix, and fixed map.
struct RackSearch<'a> {
    dawg: &'a Dawg,
    word_length: usize,
    /// Number of positions pinned in the original query; emitted words
    /// must be strictly longer than this.
    fixed_total: usize,
    blank: u8,
    /// Remaining rack, as per-letter counts.
    rack: [u32; 256],
    /// Fixed positions not yet consumed by the current prefix.
    fixed: HashMap<usize, u8>,
    prefix: Vec<u8>,
    results: BTreeSet<String>,
}

impl RackSearch<'_> {
    fn descend(&mut self, index: u32) {
        let depth = self.prefix.len();

        if let Some(&required) = self.fixed.get(&depth) {
            // A pinned position admits exactly one edge and costs nothing
            // from the rack.
            if let Some(child) = self.dawg.node(index).get(required) {
                self.fixed.remove(&depth);
                self.prefix.push(required);
                self.descend(child);
                self.prefix.pop();
                self.fixed.insert(depth, required);
            }
            return;
        }

        if depth == self.word_length {
            let node = self.dawg.node(index);
            if node.terminal && self.fixed.is_empty() && depth > self.fixed_total {
                self.results
                    .insert(String::from_utf8_lossy(&self.prefix).into_owned());
            }
            return;
        }

        let dawg = self.dawg;
        for &(letter, child) in dawg.node(index).edges.iter() {
            if self.rack[letter as usize] > 0 {
                // A literal tile beats a blank: spending the literal keeps
                // the strictly-more-flexible blank for later positions, so
                // nothing reachable through the blank branch is lost.
                self.rack[letter as usize] -= 1;
                self.prefix.push(letter);
                self.descend(child);
                self.prefix.pop();
                self.rack[letter as usize] += 1;
            } else if self.rack[self.blank as usize] > 0 {
                self.rack[self.blank as usize] -= 1;
                self.prefix.push(letter);
                self.descend(child);
                self.prefix.pop();
                self.rack[self.blank as usize] += 1;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dawg::Builder;

    fn build(words: &[&str]) -> Dawg {
        let mut builder = Builder::new();
        for word in words {
            builder.insert(*word).unwrap();
        }
        builder.build()
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn plain_rack_enumeration() {
        let dawg = build(&["act", "cat"]);
        let found = dawg.anagrams(b"cat", 3, &[], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["act", "cat"]);
    }

    #[test]
    fn fixed_position_completes_word_without_rack_letter() {
        let dawg = build(&["cars", "cart", "cast"]);
        let found = dawg
            .anagrams(b"tac", 4, &[(2, b'r')], DEFAULT_BLANK)
            .unwrap();
        assert_eq!(names(&found), ["cart"]);
    }

    #[test]
    fn four_letter_rack_three_letter_words() {
        let dawg = build(&["aah", "ahi", "air", "hair", "rah", "rai", "ria"]);
        let found = dawg.anagrams(b"hair", 3, &[], DEFAULT_BLANK).unwrap();
        // "aah" needs two a's; "hair" is too long.
        assert_eq!(names(&found), ["ahi", "air", "rah", "rai", "ria"]);
    }

    #[test]
    fn blank_covers_the_missing_letter() {
        let dawg = build(&["scoresheet", "scoresheets", "sheets"]);
        let found = dawg
            .anagrams(b"sc?resheets", 11, &[], DEFAULT_BLANK)
            .unwrap();
        assert!(found.contains("scoresheets"));
    }

    #[test]
    fn results_are_words_of_exact_length() {
        let dawg = build(&["act", "acts", "cat", "cats", "scat"]);
        let found = dawg.anagrams(b"stca", 4, &[], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["acts", "cats", "scat"]);
        for word in &found {
            assert!(dawg.contains(word));
            assert_eq!(word.len(), 4);
        }
    }

    #[test]
    fn empty_rack_with_fixed_yields_nothing() {
        let dawg = build(&["cat"]);
        let found = dawg.anagrams(b"", 3, &[(0, b'c')], DEFAULT_BLANK).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn entirely_fixed_word_is_excluded() {
        let dawg = build(&["cat"]);
        let fixed = [(0, b'c'), (1, b'a'), (2, b't')];
        let found = dawg.anagrams(b"xyz", 3, &fixed, DEFAULT_BLANK).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn word_length_one() {
        let dawg = build(&["a", "b", "cd"]);
        let found = dawg.anagrams(b"ax", 1, &[], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["a"]);
    }

    #[test]
    fn all_blank_rack_finds_every_word_of_that_length() {
        let dawg = build(&["act", "cat", "cot", "dogs"]);
        let found = dawg.anagrams(b"???", 3, &[], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["act", "cat", "cot"]);

        let constrained = dawg
            .anagrams(b"???", 3, &[(0, b'c')], DEFAULT_BLANK)
            .unwrap();
        assert_eq!(names(&constrained), ["cat", "cot"]);
    }

    #[test]
    fn fixed_letter_also_in_rack_is_not_drained() {
        // The rack lacks 'c' entirely; the fixed position supplies it.
        let dawg = build(&["cat"]);
        let found = dawg.anagrams(b"at", 3, &[(0, b'c')], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["cat"]);
    }

    #[test]
    fn literal_and_blank_together_produce_no_duplicates() {
        let dawg = build(&["aa"]);
        let found = dawg.anagrams(b"a?", 2, &[], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["aa"]);
    }

    #[test]
    fn rack_letters_are_case_folded() {
        let dawg = build(&["cat"]);
        let found = dawg.anagrams(b"TAC", 3, &[], DEFAULT_BLANK).unwrap();
        assert_eq!(names(&found), ["cat"]);
    }

    #[test]
    fn zero_length_is_rejected() {
        let dawg = build(&["cat"]);
        assert!(matches!(
            dawg.anagrams(b"cat", 0, &[], DEFAULT_BLANK),
            Err(Error::ZeroLength)
        ));
    }

    #[test]
    fn fixed_position_outside_length_is_rejected() {
        let dawg = build(&["cat"]);
        let err = dawg
            .anagrams(b"cat", 3, &[(3, b'x')], DEFAULT_BLANK)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FixedOutOfRange {
                position: 3,
                word_length: 3
            }
        ));
    }

    #[test]
    fn duplicate_fixed_position_is_rejected() {
        let dawg = build(&["cat"]);
        let err = dawg
            .anagrams(b"cat", 3, &[(1, b'a'), (1, b'a')], DEFAULT_BLANK)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateFixed(1)));
    }

    #[test]
    fn no_match_is_an_empty_set_not_an_error() {
        let dawg = build(&["cat"]);
        let found = dawg.anagrams(b"xyz", 3, &[], DEFAULT_BLANK).unwrap();
        assert!(found.is_empty());
    }
}
