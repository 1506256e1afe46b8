use serde::{Deserialize, Serialize};

use crate::engine::rounded_percentage;

/// A reading summary split into Situation, Task, Action and Result slots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarParts {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
}

fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Guess the STAR slots from sentence order: the first three sentences are
/// situation, task and action, the last one is the result. A slot with no
/// sentence of its own gets the whole text.
pub fn analyze_star(text: &str) -> StarParts {
    let sentences = sentences(text);
    if sentences.len() < 3 {
        tracing::debug!(
            "summary has {} sentences, filling missing STAR slots with the full text",
            sentences.len()
        );
    }
    let slot = |sentence: Option<&&str>| {
        sentence.map_or_else(|| text.to_string(), |s| s.to_string())
    };

    StarParts {
        situation: slot(sentences.first()),
        task: slot(sentences.get(1)),
        action: slot(sentences.get(2)),
        result: slot(sentences.last()),
    }
}

fn content_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Word-overlap score in `[0, 100]`: words of `a` (lowercased, longer than
/// two characters) that also appear in `b`, over the longer word list.
/// Punctuation stays attached to words. No usable words scores 0.
pub fn similarity(a: &str, b: &str) -> u32 {
    let words_a = content_words(a);
    let words_b = content_words(b);
    let common = words_a.iter().filter(|word| words_b.contains(word)).count();
    rounded_percentage(common, words_a.len().max(words_b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "Emma walked into the enchanted forest. She wanted to find the hidden garden! \
        She helped Luna the fairy escape from a fallen leaf. Luna showed her the garden.";

    #[test]
    fn test_analyze_star_four_sentences() {
        let parts = analyze_star(SUMMARY);
        assert_eq!(parts.situation, "Emma walked into the enchanted forest");
        assert_eq!(parts.task, "She wanted to find the hidden garden");
        assert_eq!(parts.action, "She helped Luna the fairy escape from a fallen leaf");
        assert_eq!(parts.result, "Luna showed her the garden");
    }

    #[test]
    fn test_analyze_star_single_sentence() {
        let text = "Emma found a magic path";
        let parts = analyze_star(text);
        assert_eq!(parts.situation, text);
        assert_eq!(parts.task, text);
        assert_eq!(parts.action, text);
        assert_eq!(parts.result, text);
    }

    #[test]
    fn test_analyze_star_two_sentences_reuses_last_for_result() {
        let text = "Emma got lost. Luna helped her home.";
        let parts = analyze_star(text);
        assert_eq!(parts.situation, "Emma got lost");
        assert_eq!(parts.task, "Luna helped her home");
        assert_eq!(parts.action, text);
        assert_eq!(parts.result, "Luna helped her home");
    }

    #[test]
    fn test_analyze_star_empty_text() {
        assert_eq!(analyze_star(""), StarParts::default());
        let punctuation_only = analyze_star("?!.");
        assert_eq!(punctuation_only.situation, "?!.");
        assert_eq!(punctuation_only.result, "?!.");
    }

    #[test]
    fn test_similarity_identical_and_disjoint() {
        assert_eq!(similarity("the brave girl", "The Brave GIRL"), 100);
        assert_eq!(similarity("magic forest path", "quiet sunny beach"), 0);
    }

    #[test]
    fn test_similarity_uses_longer_word_list() {
        // 3 shared words over the 6 usable words of the second summary
        assert_eq!(
            similarity("Emma found the garden", "emma found a secret hidden garden today"),
            50
        );
    }

    #[test]
    fn test_similarity_without_usable_words_is_zero() {
        assert_eq!(similarity("", ""), 0);
        assert_eq!(similarity("a an to", "is it"), 0);
        assert_eq!(similarity("", "a whole sentence"), 0);
    }

    #[test]
    fn test_similarity_keeps_punctuation_on_words() {
        assert_eq!(similarity("forest.", "forest"), 0);
    }
}
