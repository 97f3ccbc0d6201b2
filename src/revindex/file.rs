use std::collections::BTreeSet;
use std::io::{BufWriter, Read, Write};

use thiserror::Error;

use super::Index;

const DELIMITER: &str = "-";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("cannot access index: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid format of index: expected a single '-' delimiter line")]
    Delimiter,
    #[error("invalid format of words map in index. Line: {0}")]
    InvalidLine(String),
    #[error("cannot unmarshal list with indices of '{word}': {source}")]
    InvalidPositions {
        word: String,
        source: serde_json::Error,
    },
    #[error("word '{word}' refers to unknown document {position}")]
    UnknownDocument { word: String, position: usize },
    #[error("title {0:?} cannot be stored in an index file")]
    InvalidTitle(String),
}

impl Index {
    pub fn save(&self, writer: impl Write) -> Result<(), IndexError> {
        // a title must stay one line and never read back as the delimiter
        if let Some(title) = self.titles.iter().find(|title| {
            title.as_str() == DELIMITER || title.contains(['\n', '\r'])
        }) {
            return Err(IndexError::InvalidTitle(title.clone()));
        }

        let mut writer = BufWriter::new(writer);
        for title in &self.titles {
            writeln!(writer, "{title}")?;
        }
        writeln!(writer, "{DELIMITER}")?;

        let mut words: Vec<_> = self.words.iter().collect();
        words.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (word, positions) in words {
            let positions: Vec<String> = positions.iter().map(usize::to_string).collect();
            writeln!(writer, "{word}:[{}]", positions.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn read(mut reader: impl Read) -> Result<Self, IndexError> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;

        let lines: Vec<&str> = contents.lines().collect();
        let mut delimiters = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| **line == DELIMITER)
            .map(|(at, _)| at);
        let split = match (delimiters.next(), delimiters.next()) {
            (Some(at), None) => at,
            _ => return Err(IndexError::Delimiter),
        };

        let mut index = Index {
            titles: lines[..split].iter().map(|title| title.to_string()).collect(),
            ..Index::default()
        };
        for line in lines[split + 1..].iter().filter(|line| !line.is_empty()) {
            let (word, positions) = line
                .rsplit_once(':')
                .filter(|(_, positions)| !positions.is_empty())
                .ok_or_else(|| IndexError::InvalidLine(line.to_string()))?;
            let positions: BTreeSet<usize> =
                serde_json::from_str(positions).map_err(|source| {
                    IndexError::InvalidPositions {
                        word: word.to_string(),
                        source,
                    }
                })?;
            if let Some(&position) = positions.range(index.titles.len()..).next() {
                return Err(IndexError::UnknownDocument {
                    word: word.to_string(),
                    position,
                });
            }
            index.words.insert(word.to_string(), positions);
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revindex::Document;

    fn sample_index() -> Index {
        Index::build([
            Document {
                title: "first.txt".to_string(),
                text: "Cats like toys".to_string(),
            },
            Document {
                title: "second.txt".to_string(),
                text: "toys: 12:30 cats!".to_string(),
            },
        ])
    }

    #[test]
    fn save_writes_sorted_words() {
        let mut out = Vec::new();
        sample_index().save(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "first.txt\nsecond.txt\n-\n12:30:[1]\ncats:[0,1]\nlike:[0]\ntoys:[0,1]\n"
        );
    }

    #[test]
    fn read_restores_saved_index() {
        let index = sample_index();
        let mut out = Vec::new();
        index.save(&mut out).unwrap();

        let restored = Index::read(out.as_slice()).unwrap();

        assert_eq!(restored, index);
        assert_eq!(restored.find("12:30 cats").get("second.txt"), Some(&2));
    }

    #[test]
    fn save_rejects_titles_that_would_not_read_back() {
        for title in ["-", "a\r", "two\nlines"] {
            let index = Index::build([Document {
                title: title.to_string(),
                text: "cats".to_string(),
            }]);
            let mut out = Vec::new();

            let err = index.save(&mut out).unwrap_err();

            assert!(matches!(err, IndexError::InvalidTitle(rejected) if rejected == title));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn read_accepts_empty_index() {
        let index = Index::read("-\n".as_bytes()).unwrap();

        assert!(index.titles().is_empty());
        assert_eq!(index.word_count(), 0);
    }

    #[test]
    fn read_rejects_missing_delimiter() {
        let err = Index::read("a.txt\nb.txt\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Delimiter));
    }

    #[test]
    fn read_rejects_second_delimiter() {
        let err = Index::read("a.txt\n-\nword:[0]\n-\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::Delimiter));
    }

    #[test]
    fn read_rejects_line_without_positions() {
        let err = Index::read("a.txt\n-\nword:\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidLine(line) if line == "word:"));

        let err = Index::read("a.txt\n-\nword\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidLine(_)));
    }

    #[test]
    fn read_rejects_bad_positions() {
        let err = Index::read("a.txt\n-\nword:[zero]\n".as_bytes()).unwrap_err();
        assert!(matches!(err, IndexError::InvalidPositions { word, .. } if word == "word"));

        let err = Index::read("a.txt\n-\nword:[0,3]\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IndexError::UnknownDocument { position: 3, .. }
        ));
    }
}
