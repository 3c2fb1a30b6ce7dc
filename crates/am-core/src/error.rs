use thiserror::Error;

/// Boxed cause carried by decode failures (the imaging library's own error type).
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors originating from the core module.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Source image unreadable, corrupt or missing.
    #[error("Impossible de décoder l'image {path} : {source}")]
    Decode {
        /// Path (or label) of the source that failed.
        path: String,
        /// Underlying decoder error.
        #[source]
        source: BoxedCause,
    },

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),

    /// Failure persisting or reading back an artifact.
    #[error("Erreur d'E/S sur {path} : {source}")]
    Io {
        /// Path that was being written or read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid width/height dimensions.
    #[error("Dimensions invalides : {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },
}

impl CoreError {
    /// Shorthand for a [`CoreError::Config`] built from anything displayable.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_keeps_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header");
        let err = CoreError::Decode {
            path: "photo.png".into(),
            source: Box::new(cause),
        };
        let msg = err.to_string();
        assert!(msg.contains("photo.png"));
        assert!(msg.contains("bad header"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
