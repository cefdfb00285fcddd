//! Tokenization, stop-word filtering, and word n-gram expansion.

use std::collections::HashSet;

/// English stop words removed before indexing when enabled.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "been",
    "before", "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
    "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done", "down",
    "during", "each", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "for", "from", "further", "get",
    "give", "go", "had", "has", "have", "having", "he", "hence", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "however", "i", "ie", "if", "in", "indeed",
    "into", "is", "it", "its", "itself", "just", "keep", "last", "least", "less", "made",
    "many", "may", "me", "meanwhile", "might", "mine", "more", "moreover", "most", "mostly",
    "much", "must", "my", "myself", "namely", "neither", "never", "nevertheless", "next", "no",
    "nobody", "none", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
    "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "re", "same",
    "see", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still",
    "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "thereafter", "thereby", "therefore", "therein", "these", "they", "this", "those",
    "though", "through", "throughout", "thru", "thus", "to", "together", "too", "toward",
    "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereas", "whereby", "wherein",
    "whether", "which", "while", "who", "whoever", "whole", "whom", "whose", "why", "will",
    "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Which stop words the tokenizer drops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopWords {
    #[default]
    English,
    None,
    Custom(Vec<String>),
}

impl StopWords {
    fn to_set(&self) -> HashSet<String> {
        match self {
            StopWords::English => ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            StopWords::None => HashSet::new(),
            StopWords::Custom(words) => words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

/// Lower-cases text, splits on non-alphanumerics, drops short tokens and
/// stop words, then emits word n-grams from 1 to `ngram_max`.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: HashSet<String>,
    ngram_max: usize,
}

impl Analyzer {
    pub fn new(stop_words: &StopWords, ngram_max: usize) -> Self {
        Self {
            stop_words: stop_words.to_set(),
            ngram_max: ngram_max.max(1),
        }
    }

    /// Produce the term sequence for one document, in order of appearance.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let words: Vec<String> = tokenize(text)
            .into_iter()
            .filter(|w| !self.stop_words.contains(w))
            .collect();

        let mut terms = Vec::with_capacity(words.len() * self.ngram_max);
        terms.extend(words.iter().cloned());
        for n in 2..=self.ngram_max {
            if words.len() < n {
                break;
            }
            terms.extend(words.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

/// Split on anything that is not alphanumeric, keeping tokens of 2+ chars.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_punctuation_and_case() {
        assert_eq!(
            tokenize("OPI Infinite-Shine, 0.5oz (Red)!"),
            vec!["opi", "infinite", "shine", "5oz", "red"]
        );
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        assert_eq!(tokenize("a b cd e"), vec!["cd"]);
    }

    #[test]
    fn test_analyzer_removes_stop_words() {
        let a = Analyzer::new(&StopWords::English, 1);
        assert_eq!(a.analyze("The best of the nail polish"), vec!["best", "nail", "polish"]);
    }

    #[test]
    fn test_analyzer_bigrams_after_stop_words() {
        let a = Analyzer::new(&StopWords::English, 2);
        assert_eq!(
            a.analyze("nail and polish remover"),
            vec!["nail", "polish", "remover", "nail polish", "polish remover"]
        );
    }

    #[test]
    fn test_analyzer_without_stop_words() {
        let a = Analyzer::new(&StopWords::None, 1);
        assert_eq!(a.analyze("the lip"), vec!["the", "lip"]);
    }

    #[test]
    fn test_custom_stop_words_case_insensitive() {
        let a = Analyzer::new(&StopWords::Custom(vec!["Shampoo".to_string()]), 1);
        assert_eq!(a.analyze("dry shampoo spray"), vec!["dry", "spray"]);
    }
}
