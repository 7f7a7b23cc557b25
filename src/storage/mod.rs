//! Ledger persistence layer
//!
//! Saves the whole token registry as one JSON document, written through a
//! temp file and an atomic rename, with rotating backups of the previous
//! snapshot.

use crate::ledger::LedgerManager;
use std::fs;
use std::io::{self, BufReader, BufWriter};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: std::path::PathBuf,
    pub ledger_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: std::path::PathBuf::from(".ledger_data"),
            ledger_file: "ledger.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

/// Ledger storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    /// Get the ledger file path
    fn ledger_path(&self) -> std::path::PathBuf {
        self.config.data_dir.join(&self.config.ledger_file)
    }

    /// Get a backup file path
    fn backup_path(&self, index: usize) -> std::path::PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.ledger_file, index))
    }

    /// Save the registry to disk
    pub fn save(&self, manager: &LedgerManager) -> Result<(), StorageError> {
        let path = self.ledger_path();

        // Create backup if enabled
        if self.config.backup_enabled && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first
        let temp_path = self.config.data_dir.join("ledger.tmp");
        let file = fs::File::create(&temp_path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, manager)?;

        // Atomic rename
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Load the registry from disk
    pub fn load(&self) -> Result<LedgerManager, StorageError> {
        let path = self.ledger_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Ledger file not found".to_string(),
            ));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);

        Ok(serde_json::from_reader(reader)?)
    }

    /// Check if a saved registry exists
    pub fn exists(&self) -> bool {
        self.ledger_path().exists()
    }

    /// Delete the saved registry
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.ledger_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Rotate backup files
    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                let next = self.backup_path(i + 1);
                fs::rename(&current, &next)?;
            }
        }

        Ok(())
    }

    /// Restore from a backup
    pub fn restore_backup(&self, backup_index: usize) -> Result<LedgerManager, StorageError> {
        let path = self.backup_path(backup_index);

        if !path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);

        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Address;
    use tempfile::TempDir;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn test_storage() -> (Storage, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        (Storage::new(config).unwrap(), dir)
    }

    #[test]
    fn test_save_and_load() {
        let (storage, _dir) = test_storage();

        let mut manager = LedgerManager::new();
        let token = manager
            .deploy("Saved".to_string(), "SAV".to_string(), 0, 1000, addr(1))
            .unwrap();
        manager.transfer(&token, addr(1), addr(2), 250).unwrap();

        assert!(!storage.exists());
        storage.save(&manager).unwrap();
        assert!(storage.exists());

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.count(), 1);
        assert_eq!(loaded.balance_of(&token, &addr(2)).unwrap(), 250);
    }

    #[test]
    fn test_load_missing_file() {
        let (storage, _dir) = test_storage();

        let result = storage.load();
        assert!(matches!(result, Err(StorageError::InvalidData(_))));
    }

    #[test]
    fn test_backup_rotation_and_restore() {
        let (storage, _dir) = test_storage();

        let mut manager = LedgerManager::new();
        let token = manager
            .deploy("Backed".to_string(), "BCK".to_string(), 0, 1000, addr(1))
            .unwrap();
        storage.save(&manager).unwrap();

        // Second save pushes the first snapshot into backup slot 0
        manager.transfer(&token, addr(1), addr(2), 100).unwrap();
        storage.save(&manager).unwrap();

        let restored = storage.restore_backup(0).unwrap();
        assert_eq!(restored.balance_of(&token, &addr(2)).unwrap(), 0);

        let current = storage.load().unwrap();
        assert_eq!(current.balance_of(&token, &addr(2)).unwrap(), 100);
    }

    #[test]
    fn test_delete() {
        let (storage, _dir) = test_storage();

        storage.save(&LedgerManager::new()).unwrap();
        assert!(storage.exists());

        storage.delete().unwrap();
        assert!(!storage.exists());
    }
}
