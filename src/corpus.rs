use std::path::Path;

use tokio::task::JoinSet;

use crate::{error::AppError, revindex::Document};

pub async fn load_documents(dir: &Path) -> Result<Vec<Document>, AppError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut reads = JoinSet::new();

    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        reads.spawn(async move {
            let path = entry.path();
            let title = entry.file_name().to_string_lossy().into_owned();
            match tokio::fs::read(&path).await {
                Ok(bytes) => Some(Document {
                    title,
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                }),
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "Skipping unreadable file");
                    None
                }
            }
        });
    }

    let mut documents = Vec::new();
    while let Some(document) = reads.join_next().await {
        documents.extend(document?);
    }
    documents.sort_unstable_by(|a, b| a.title.cmp(&b.title));

    tracing::info!(dir = %dir.display(), documents = documents.len(), "Loaded corpus");
    Ok(documents)
}
