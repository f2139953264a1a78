//! JSON output of an edition.
//!
//! Files are organized by date, one file per run:
//! ```text
//! output_dir/
//! └── 2026-10-19/
//!     ├── 08-15-02.json
//!     └── 14-05-41.json
//! ```

use crate::models::Edition;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the JSON file for `edition` under `output_dir`.
pub fn edition_path(edition: &Edition, output_dir: &str) -> PathBuf {
    Path::new(output_dir)
        .join(&edition.local_date)
        .join(format!("{}.json", edition.local_time.replace(':', "-")))
}

/// Write an [`Edition`] to `{output_dir}/{date}/{HH-MM-SS}.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_edition(
    edition: &Edition,
    output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(edition)?;
    let path = edition_path(edition, output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote edition JSON");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DialogueResult, NewsItem};

    fn edition() -> Edition {
        Edition {
            local_date: "2026-10-19".to_string(),
            local_time: "14:05:41".to_string(),
            data_hora: "Segunda-feira, 19/10/2026, 14:05".to_string(),
            news: NewsItem::new("Título", "Resumo com mais de quatro palavras", "https://example.com"),
            dialogue: DialogueResult::generated("<p><strong>Sagredo:</strong> Olá</p>"),
        }
    }

    #[test]
    fn test_edition_path() {
        let path = edition_path(&edition(), "/tmp/edicoes");
        assert_eq!(path, PathBuf::from("/tmp/edicoes/2026-10-19/14-05-41.json"));
    }

    #[tokio::test]
    async fn test_write_edition() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_edition(&edition(), dir.path().to_str().unwrap()).await.unwrap();
        assert!(path.starts_with(dir.path().join("2026-10-19")));

        let written = std::fs::read_to_string(&path).unwrap();
        let back: Edition = serde_json::from_str(&written).unwrap();
        assert_eq!(back.news.title(), "Título");
        assert_eq!(back.dialogue.as_str(), "<p><strong>Sagredo:</strong> Olá</p>");
    }
}
