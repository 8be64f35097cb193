//! Configuration management for proofchain

use crate::blockchain::{
    DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD, GENESIS_TIMESTAMP, MAX_DIFFICULTY,
};
use crate::error::ChainError;
use crate::transaction::Amount;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "proofchain.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Leading hex zeros a block hash needs.
    #[serde(default = "default_difficulty")]
    pub difficulty: usize,
    #[serde(default = "default_mining_reward")]
    pub mining_reward: Amount,
    #[serde(default = "default_genesis_timestamp")]
    pub genesis_timestamp: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            mining_reward: default_mining_reward(),
            genesis_timestamp: default_genesis_timestamp(),
        }
    }
}

impl LedgerConfig {
    pub fn from_toml(source: &str) -> Result<Self, ChainError> {
        let config: LedgerConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "difficulty must be at most {}, got {}",
                MAX_DIFFICULTY, self.difficulty
            )));
        }
        Ok(())
    }
}

fn default_difficulty() -> usize {
    DEFAULT_DIFFICULTY
}

fn default_mining_reward() -> Amount {
    DEFAULT_MINING_REWARD
}

fn default_genesis_timestamp() -> u64 {
    GENESIS_TIMESTAMP
}

/// Reads `path`, falling back to defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<LedgerConfig, ChainError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(LedgerConfig::default());
    }

    let config_str = fs::read_to_string(path)?;
    LedgerConfig::from_toml(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.difficulty, 5);
        assert_eq!(config.mining_reward, 50);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "difficulty = 2").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.mining_reward, DEFAULT_MINING_REWARD);
        assert_eq!(config.genesis_timestamp, GENESIS_TIMESTAMP);
    }

    #[test]
    fn test_excessive_difficulty_rejected() {
        let result = LedgerConfig::from_toml("difficulty = 65");
        assert!(matches!(result, Err(ChainError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = LedgerConfig::from_toml("difficulty = \"high\"");
        assert!(matches!(result, Err(ChainError::Config(_))));
    }
}
