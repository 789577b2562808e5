use crate::core::{ConfigProvider, Storage};
use crate::utils::error::Result;
use std::path::Path;

/// Writes exports under a base directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.output_path().to_string())
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("exports").join("today");
        let storage = LocalStorage::new(base.to_str().unwrap().to_string());

        tokio_test::block_on(storage.write_file("search_results.txt", b"[A]\nx")).unwrap();

        let written = std::fs::read(base.join("search_results.txt")).unwrap();
        assert_eq!(written, b"[A]\nx");
    }

    #[test]
    fn test_from_config_uses_output_path() {
        let settings = crate::config::Settings {
            output_path: "exports".to_string(),
            ..crate::config::Settings::default()
        };
        let storage = LocalStorage::from_config(&settings);

        let expected = Path::new("exports").join("search_results.txt").display().to_string();
        assert_eq!(storage.location("search_results.txt"), expected);
    }

    #[test]
    fn test_location_joins_base_path() {
        let storage = LocalStorage::new("out".to_string());
        let expected = Path::new("out").join("search_results.txt").display().to_string();
        assert_eq!(storage.location("search_results.txt"), expected);
    }
}
