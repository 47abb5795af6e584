//! Error types for MAGI

use thiserror::Error;

/// The main error type for MAGI operations
#[derive(Debug, Error)]
pub enum MagiError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Surface transfer failed: {0}")]
    SurfaceTransfer(String),

    #[error("Worker spawn failed: {0}")]
    WorkerSpawn(String),

    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    #[error("Draw error in task '{task}': {message}")]
    DrawError { task: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for MAGI operations
pub type Result<T> = std::result::Result<T, MagiError>;

impl From<toml::de::Error> for MagiError {
    fn from(err: toml::de::Error) -> Self {
        MagiError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for MagiError {
    fn from(err: toml::ser::Error) -> Self {
        MagiError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_errors_convert() {
        let err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let magi: MagiError = err.into();
        assert!(matches!(magi, MagiError::TomlParseError(_)));
    }

    #[test]
    fn draw_error_message_names_task() {
        let err = MagiError::DrawError {
            task: "HoloWave".into(),
            message: "surface lost".into(),
        };
        assert_eq!(err.to_string(), "Draw error in task 'HoloWave': surface lost");
    }
}
