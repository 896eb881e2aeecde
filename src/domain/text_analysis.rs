use serde::{Deserialize, Serialize};

/// Word counts over a cleaned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStatistics {
    pub total_words: usize,
    pub unique_words: usize,
    /// Most frequent words, highest count first; ties keep first-seen order.
    pub top_words: Vec<(String, usize)>,
}

/// Persisted result of analysing a text document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub statistics: TextStatistics,
    pub paragraphs: Vec<String>,
}
