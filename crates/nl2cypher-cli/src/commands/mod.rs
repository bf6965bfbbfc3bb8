pub mod ask;
pub mod normalize;
pub mod schema;
pub mod serve;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;


/// Read the whole input file, or stdin when no file is given.
pub async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "MATCH (d:Drug) RETURN d").unwrap();
        assert_eq!(read_input(Some(file.path())).await.unwrap(), "MATCH (d:Drug) RETURN d");
    }

    #[tokio::test]
    async fn test_missing_file_names_path() {
        let err = read_input(Some(Path::new("/nonexistent/q.cypher"))).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/q.cypher"));
    }
}
