use crate::common::defs::{Discrete, State};
use std::path::PathBuf;

/// Errors raised while constructing a grid domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid size must be positive, got {size}")]
    NonPositiveSize { size: Discrete },

    #[error("terminal state {state} lies outside the {size}x{size} grid")]
    TerminalOutOfBounds { state: State, size: Discrete },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_display() {
        let err = GridError::TerminalOutOfBounds {
            state: State::new(6, 0),
            size: 6,
        };
        assert_eq!(
            err.to_string(),
            "terminal state (6, 0) lies outside the 6x6 grid"
        );
    }

    #[test]
    fn config_error_wraps_grid_error() {
        let err = ConfigError::from(GridError::NonPositiveSize { size: 0 });
        assert_eq!(
            err.to_string(),
            "invalid grid: grid size must be positive, got 0"
        );
    }
}
