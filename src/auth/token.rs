use std::path::PathBuf;

use anyhow::{Context, Result};

/// Token file name in the data directory - the single fixed key the session
/// token is persisted under, surviving restarts.
const TOKEN_FILE: &str = "auth_token";

/// Durable storage for the opaque session token.
///
/// Written on login success, removed on logout or verification failure, read
/// once at process start. The session guard is the only owner.
pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Read the persisted token, if any. An empty or whitespace-only file
    /// counts as no token.
    pub fn load(&self) -> Result<Option<String>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&path).context("Failed to read token file")?;
        let token = contents.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(token.to_string()))
        }
    }

    /// Persist the token, creating the data directory if needed
    pub fn save(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .context("Failed to create data directory")?;
        std::fs::write(self.token_path(), token).context("Failed to write token file")?;
        Ok(())
    }

    /// Remove the persisted token. A no-op when nothing is stored.
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested"));
        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_clear_removes_token_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        store.save("abc123").unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing again must not fail
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_whitespace_only_file_counts_as_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().to_path_buf());
        store.save("  \n").unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
