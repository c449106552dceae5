//! Text statistics and the six readability formulas.
//!
//! Syllables are counted with the usual vowel-group heuristic (silent trailing
//! `e` dropped, minimum one per word). It is not a dictionary, but it is
//! deterministic and stable enough for relative scoring.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::models::ReadabilityScores;

/// Counts gathered from a block of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextStats {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    pub letters: usize,
    /// Words with three or more syllables.
    pub polysyllables: usize,
}

impl TextStats {
    pub fn words_per_sentence(&self) -> f64 {
        if self.sentences == 0 {
            0.0
        } else {
            self.words as f64 / self.sentences as f64
        }
    }

    pub fn syllables_per_word(&self) -> f64 {
        if self.words == 0 {
            0.0
        } else {
            self.syllables as f64 / self.words as f64
        }
    }
}

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+(?:['’-][\p{L}\p{N}]+)*").expect("valid word regex"))
}

fn sentence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("valid sentence regex"))
}

/// Words in reading order.
pub fn tokenize(text: &str) -> Vec<&str> {
    word_regex().find_iter(text).map(|m| m.as_str()).collect()
}

/// Sentences containing at least one word; never zero when text has words.
pub fn count_sentences(text: &str) -> usize {
    let counted = sentence_regex()
        .split(text)
        .filter(|segment| word_regex().is_match(segment))
        .count();
    if counted == 0 && word_regex().is_match(text) {
        1
    } else {
        counted
    }
}

pub fn count_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();
    if lower.is_empty() {
        return 0;
    }
    if lower.len() <= 3 {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut groups = 0;
    let mut previous_vowel = false;
    for &c in &lower {
        let vowel = is_vowel(c);
        if vowel && !previous_vowel {
            groups += 1;
        }
        previous_vowel = vowel;
    }

    // silent trailing "e", but keep "-le" endings ("table", "little")
    let n = lower.len();
    if lower[n - 1] == 'e' && !(lower[n - 2] == 'l' && !is_vowel(lower[n - 3])) && groups > 1 {
        groups -= 1;
    }

    groups.max(1)
}

pub fn text_stats(text: &str) -> TextStats {
    let words = tokenize(text);
    let mut stats = TextStats {
        words: words.len(),
        sentences: count_sentences(text),
        ..Default::default()
    };
    for word in &words {
        let syllables = count_syllables(word);
        stats.syllables += syllables;
        stats.letters += word.chars().filter(|c| c.is_alphanumeric()).count();
        if syllables >= 3 {
            stats.polysyllables += 1;
        }
    }
    stats
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Flesch reading ease: `206.835 − 1.015·(words/sentences) − 84.6·(syllables/words)`.
pub fn flesch_reading_ease(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    206.835 - 1.015 * stats.words_per_sentence() - 84.6 * stats.syllables_per_word()
}

pub fn flesch_kincaid_grade(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    0.39 * stats.words_per_sentence() + 11.8 * stats.syllables_per_word() - 15.59
}

pub fn smog(stats: &TextStats) -> f64 {
    if stats.sentences == 0 {
        return 0.0;
    }
    1.0430 * (stats.polysyllables as f64 * 30.0 / stats.sentences as f64).sqrt() + 3.1291
}

pub fn automated_readability_index(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    4.71 * (stats.letters as f64 / stats.words as f64) + 0.5 * stats.words_per_sentence() - 21.43
}

pub fn coleman_liau(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    let letters_per_100 = stats.letters as f64 / stats.words as f64 * 100.0;
    let sentences_per_100 = stats.sentences as f64 / stats.words as f64 * 100.0;
    0.0588 * letters_per_100 - 0.296 * sentences_per_100 - 15.8
}

pub fn gunning_fog(stats: &TextStats) -> f64 {
    if stats.words == 0 {
        return 0.0;
    }
    0.4 * (stats.words_per_sentence() + 100.0 * stats.polysyllables as f64 / stats.words as f64)
}

/// All six formulas, rounded to two decimals.
pub fn readability_scores(stats: &TextStats) -> ReadabilityScores {
    ReadabilityScores {
        flesch_kincaid: round2(flesch_kincaid_grade(stats)),
        flesch_reading_ease: round2(flesch_reading_ease(stats)),
        smog: round2(smog(stats)),
        ari: round2(automated_readability_index(stats)),
        coleman_liau: round2(coleman_liau(stats)),
        gunning_fog: round2(gunning_fog(stats)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("readability"), 5);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("123"), 0);
    }

    #[test]
    fn test_sentence_count_never_zero_for_text() {
        assert_eq!(count_sentences("no terminal punctuation here"), 1);
        assert_eq!(count_sentences("One. Two! Three?"), 3);
        assert_eq!(count_sentences("Wait... what?!"), 2);
        assert_eq!(count_sentences("   "), 0);
    }

    #[test]
    fn test_tokenize_keeps_contractions() {
        let words = tokenize("Don't split well-known words, ok?");
        assert_eq!(words, vec!["Don't", "split", "well-known", "words", "ok"]);
    }

    #[test]
    fn test_flesch_reading_ease_formula() {
        let stats = TextStats {
            words: 100,
            sentences: 5,
            syllables: 150,
            letters: 450,
            polysyllables: 10,
        };
        // 206.835 - 1.015 * 20 - 84.6 * 1.5
        let expected = 206.835 - 20.3 - 126.9;
        assert!((flesch_reading_ease(&stats) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_simple_text_reads_easier_than_dense_text() {
        let simple = text_stats("The cat sat. The dog ran. We had fun in the sun.");
        let dense = text_stats(
            "Organizational interoperability necessitates comprehensive institutional \
             documentation, particularly regarding administrative responsibilities.",
        );
        assert!(flesch_reading_ease(&simple) > flesch_reading_ease(&dense));
        assert!(flesch_kincaid_grade(&simple) < flesch_kincaid_grade(&dense));
        assert!(gunning_fog(&simple) < gunning_fog(&dense));
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let scores = readability_scores(&text_stats(""));
        assert_eq!(scores, ReadabilityScores::default());
    }
}
