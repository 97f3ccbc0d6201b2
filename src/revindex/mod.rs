//! Reverse index from normalised words to the documents containing them.

mod file;

use std::collections::{BTreeMap, BTreeSet, HashMap};

pub use file::IndexError;

pub type SearchResults = BTreeMap<String, u64>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Index {
    titles: Vec<String>,
    words: HashMap<String, BTreeSet<usize>>,
}

pub fn unify_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(unify_word)
        .filter(|word| !word.is_empty())
}

impl Index {
    pub fn build(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut index = Index::default();
        for (position, document) in documents.into_iter().enumerate() {
            for word in words(&document.text) {
                index.words.entry(word).or_default().insert(position);
            }
            index.titles.push(document.title);
        }
        index
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> {
        self.words
            .iter()
            .map(|(word, positions)| (word.as_str(), positions))
    }

    pub fn find(&self, phrase: &str) -> SearchResults {
        let mut results = SearchResults::new();
        for word in words(phrase) {
            let Some(positions) = self.words.get(&word) else {
                continue;
            };
            for &position in positions {
                *results.entry(self.titles[position].clone()).or_default() += 1;
            }
        }
        results
    }
}
