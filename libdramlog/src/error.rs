//! Error types for Dramlog

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DramlogError>;

#[derive(Error, Debug)]
pub enum DramlogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl DramlogError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DramlogError::InvalidInput(_) => 3,
            DramlogError::NotFound(_) => 3,
            DramlogError::Config(_) => 2,
            DramlogError::Store(_) => 2,
            DramlogError::InvalidTransition(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize events: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = DramlogError::InvalidInput("Title is required".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_not_found() {
        let error = DramlogError::NotFound("Event abc".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_store_and_config() {
        let store = DramlogError::Store(StoreError::Poisoned);
        assert_eq!(store.exit_code(), 2);

        let config = DramlogError::Config(ConfigError::MissingField("storage.path".to_string()));
        assert_eq!(config.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_invalid_transition() {
        let error = DramlogError::InvalidTransition("Event is completed".to_string());
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting() {
        let error = DramlogError::InvalidInput("Select at least one whisky".to_string());
        assert_eq!(format!("{}", error), "Invalid input: Select at least one whisky");

        let config_error = ConfigError::MissingField("data directory".to_string());
        let error = DramlogError::Config(config_error);
        assert_eq!(
            format!("{}", error),
            "Configuration error: Missing required field: data directory"
        );
    }

    #[test]
    fn test_error_conversion_from_store_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: DramlogError = StoreError::Io(io_error).into();

        match error {
            DramlogError::Store(StoreError::Io(_)) => {}
            _ => panic!("Expected DramlogError::Store"),
        }
    }
}
