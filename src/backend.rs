use std::{path::Path, sync::Arc};

use crate::{
    db::Db,
    error::AppError,
    revindex::{Index, SearchResults},
};

#[derive(Clone)]
pub enum Backend {
    Database(Db),
    Memory(Arc<Index>),
}

impl Backend {
    pub async fn from_index_file(path: &Path) -> Result<Self, AppError> {
        let contents = tokio::fs::read(path).await?;
        let index = Index::read(contents.as_slice())?;
        tracing::info!(
            path = %path.display(),
            titles = index.titles().len(),
            words = index.word_count(),
            "Loaded index file"
        );
        Ok(Self::Memory(Arc::new(index)))
    }

    pub async fn find(&self, phrase: &str) -> Result<SearchResults, AppError> {
        match self {
            Self::Database(db) => db.find(phrase).await,
            Self::Memory(index) => Ok(index.find(phrase)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revindex::Document;

    #[tokio::test]
    async fn loads_index_file_and_searches_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        let index = Index::build([Document {
            title: "a.txt".to_string(),
            text: "cats and more cats".to_string(),
        }]);
        index.save(std::fs::File::create(&path).unwrap()).unwrap();

        let backend = Backend::from_index_file(&path).await.unwrap();

        assert_eq!(
            backend.find("Cats!").await.unwrap(),
            SearchResults::from([("a.txt".to_string(), 1)])
        );
    }

    #[tokio::test]
    async fn broken_index_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.txt");
        std::fs::write(&path, "no delimiter here\n").unwrap();

        assert!(matches!(
            Backend::from_index_file(&path).await,
            Err(AppError::Index(_))
        ));
    }
}
