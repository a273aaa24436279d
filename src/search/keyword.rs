//! Coarse keyword narrowing: tokenize a query, drop filler words, and keep
//! courses whose tags mention any remaining keyword.

use std::collections::HashSet;

use crate::models::CourseRecord;

/// Words that carry no topic on their own. `course`/`courses` are deliberately
/// absent: they drive the list-everything rule instead.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    // articles, pronouns, connectives
    "a", "an", "the", "i", "me", "my", "mine", "we", "us", "our", "you", "your", "it", "its",
    "this", "that", "these", "those", "there", "here", "is", "are", "am", "was", "be", "been",
    "to", "of", "in", "on", "at", "by", "for", "from", "with", "about", "and", "or", "as",
    "any", "some", "all", "every", "what", "which", "who", "how", "where", "when", "why",
    "can", "could", "would", "should", "will", "do", "does", "did", "please", "so", "if",
    // generic request verbs
    "show", "find", "want", "need", "give", "get", "list", "tell", "search", "looking",
    "look", "recommend", "suggest", "help", "like", "know", "see", "have", "has", "let",
    "learn", "learning", "study", "start", "teach", "take",
    // generic qualifiers
    "best", "good", "top", "new", "more", "other", "available", "related", "something",
    // roadmap vocabulary
    "developer", "roadmap", "become", "career", "path",
];

/// Query words that, standing alone, mean "show me the whole catalog".
pub const GENERIC_WORDS: &[&str] = &["course", "courses"];

/// Stopword set, default list plus any configured extras.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOPWORDS.iter().copied())
    }
}

impl StopwordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Default list extended with `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.words
            .extend(extra.into_iter().map(|w| w.as_ref().to_lowercase()));
        set
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }
}

/// Distinct lowercase keywords in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for word in words {
            set.insert(word.into());
        }
        set
    }

    fn insert(&mut self, word: String) {
        if !self.words.contains(&word) {
            self.words.push(word);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// True when the query asked for nothing but "course"/"courses".
    pub fn is_list_everything(&self) -> bool {
        !self.words.is_empty() && self.words.iter().all(|w| GENERIC_WORDS.contains(&w.as_str()))
    }

    /// Topic keywords only: the generic domain words are dropped.
    pub fn topical(&self) -> KeywordSet {
        KeywordSet {
            words: self
                .words
                .iter()
                .filter(|w| !GENERIC_WORDS.contains(&w.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn join(&self, separator: &str) -> String {
        self.words.join(separator)
    }
}

/// Query tokenizer parameterized by a stopword set.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordSet,
}

impl Tokenizer {
    pub fn new(stopwords: StopwordSet) -> Self {
        Self { stopwords }
    }

    /// Lowercase, split on non-word characters, drop stopwords and repeats.
    pub fn tokenize(&self, query: &str) -> KeywordSet {
        let lowered = query.to_lowercase();
        KeywordSet::from_words(
            lowered
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|t| !t.is_empty() && !self.stopwords.contains(t)),
        )
    }
}

/// Catalog positions of records whose tags contain any keyword (case-insensitive
/// substring), in catalog order, first occurrence of each name only.
pub fn filter_positions(records: &[CourseRecord], keywords: &KeywordSet) -> Vec<usize> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut positions = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let tags = record.tags.to_lowercase();
        if keywords.iter().any(|k| tags.contains(k)) && seen.insert(record.name.as_str()) {
            positions.push(i);
        }
    }
    positions
}

/// Records whose tags match any keyword, deduplicated by name.
pub fn filter_candidates<'a>(
    records: &'a [CourseRecord],
    keywords: &KeywordSet,
) -> Vec<&'a CourseRecord> {
    filter_positions(records, keywords)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(name: &str, tags: &str) -> CourseRecord {
        CourseRecord {
            name: name.into(),
            tags: tags.into(),
            ..CourseRecord::default()
        }
    }

    fn catalog() -> Vec<CourseRecord> {
        vec![
            course("Python Basics", "Python, Programming"),
            course("React Guide", "react, javascript, frontend"),
            course("Data Science", "python, pandas, statistics"),
            course("Python Basics", "python"),
            course("Cooking", "food"),
        ]
    }

    #[test]
    fn test_tokenize_strips_stopwords_and_punctuation() {
        let kw = Tokenizer::default().tokenize("Show me the best Python, and React courses!");
        assert_eq!(kw, KeywordSet::from_words(["python", "react", "courses"]));
    }

    #[test]
    fn test_tokenize_deduplicates() {
        let kw = Tokenizer::default().tokenize("python PYTHON python");
        assert_eq!(kw.len(), 1);
    }

    #[test]
    fn test_tokenize_roadmap_words_are_stopwords() {
        let kw = Tokenizer::default().tokenize("python developer roadmap");
        assert_eq!(kw, KeywordSet::from_words(["python"]));
    }

    #[test]
    fn test_tokenize_extra_stopwords() {
        let tokenizer = Tokenizer::new(StopwordSet::with_extra(["Beginner"]));
        let kw = tokenizer.tokenize("beginner sql");
        assert_eq!(kw, KeywordSet::from_words(["sql"]));
    }

    #[test]
    fn test_list_everything_signal() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("courses").is_list_everything());
        assert!(tokenizer.tokenize("Show me all the courses").is_list_everything());
        assert!(tokenizer.tokenize("course").is_list_everything());
        assert!(!tokenizer.tokenize("python courses").is_list_everything());
        assert!(!tokenizer.tokenize("show me").is_list_everything());
    }

    #[test]
    fn test_topical_drops_generic_words() {
        let kw = Tokenizer::default().tokenize("python courses");
        assert_eq!(kw.topical(), KeywordSet::from_words(["python"]));
    }

    #[test]
    fn test_filter_matches_tag_substrings_case_insensitive() {
        let records = catalog();
        let found = filter_candidates(&records, &KeywordSet::from_words(["python"]));
        let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Python Basics", "Data Science"]);
    }

    #[test]
    fn test_filter_any_keyword_matches() {
        let records = catalog();
        let positions = filter_positions(&records, &KeywordSet::from_words(["pandas", "front"]));
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_filter_results_all_match_and_are_unique() {
        let records = catalog();
        let keywords = KeywordSet::from_words(["py", "food", "script"]);
        let found = filter_candidates(&records, &keywords);
        let mut names = HashSet::new();
        for r in &found {
            let tags = r.tags.to_lowercase();
            assert!(keywords.iter().any(|k| tags.contains(k)));
            assert!(names.insert(r.name.clone()));
        }
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn test_filter_no_match_is_empty() {
        let records = catalog();
        assert!(filter_candidates(&records, &KeywordSet::from_words(["haskell"])).is_empty());
    }

    #[test]
    fn test_filter_empty_keywords_matches_nothing() {
        let records = catalog();
        assert!(filter_positions(&records, &KeywordSet::default()).is_empty());
    }
}
