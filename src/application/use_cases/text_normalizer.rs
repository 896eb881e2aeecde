// ============================================================
// TEXT NORMALIZER
// ============================================================
// Paragraph cleaning and word-frequency statistics

use std::collections::HashMap;

use crate::domain::text_analysis::{TextAnalysis, TextStatistics};

const TOP_WORDS: usize = 5;

/// Lowercase, drop ASCII punctuation, collapse whitespace.
pub fn clean(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|ch| !ch.is_ascii_punctuation())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word counts over whitespace tokens. Ties in the top list keep the order in
/// which the words first appeared.
pub fn statistics(text: &str) -> TextStatistics {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    let mut total_words = 0;

    for token in text.split_whitespace() {
        total_words += 1;
        let count = counts.entry(token).or_insert(0);
        if *count == 0 {
            first_seen.push(token);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .iter()
        .map(|word| (word.to_string(), counts[word]))
        .collect();
    // stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_WORDS);

    TextStatistics {
        total_words,
        unique_words: first_seen.len(),
        top_words: ranked,
    }
}

/// Clean every paragraph, drop the ones left empty, and compute statistics
/// over their concatenation.
pub fn analyze(paragraphs: &[String]) -> TextAnalysis {
    let cleaned: Vec<String> = paragraphs
        .iter()
        .map(|paragraph| clean(paragraph))
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    TextAnalysis {
        statistics: statistics(&cleaned.join(" ")),
        paragraphs: cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("The cat sat. The cat ran!"), "the cat sat the cat ran");
        assert_eq!(clean("  Olá,\tMUNDO!!  \n ok "), "olá mundo ok");
        assert_eq!(clean("...!?"), "");
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean("Receita: R$ 1.000,00 (bruta)");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_statistics_ranking() {
        let stats = statistics(&clean("The cat sat. The cat ran!"));
        assert_eq!(stats.total_words, 6);
        assert_eq!(stats.unique_words, 4);
        assert_eq!(
            stats.top_words,
            vec![
                ("the".to_string(), 2),
                ("cat".to_string(), 2),
                ("sat".to_string(), 1),
                ("ran".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_words_limited_to_five() {
        let stats = statistics("a b c d e f g a");
        assert_eq!(stats.top_words.len(), 5);
        assert_eq!(stats.top_words[0], ("a".to_string(), 2));
        assert_eq!(stats.top_words[4], ("e".to_string(), 1));
    }

    #[test]
    fn test_statistics_of_nothing() {
        let stats = statistics("");
        assert_eq!(stats.total_words, 0);
        assert_eq!(stats.unique_words, 0);
        assert!(stats.top_words.is_empty());
    }

    #[test]
    fn test_analyze_drops_paragraphs_emptied_by_cleaning() {
        let analysis = analyze(&["Hello, world!".to_string(), "---".to_string(), "World".to_string()]);
        assert_eq!(analysis.paragraphs, vec!["hello world", "world"]);
        assert_eq!(analysis.statistics.total_words, 3);
        assert_eq!(analysis.statistics.top_words[0], ("world".to_string(), 2));
    }
}
