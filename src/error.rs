// File: src/error.rs
use crate::services::streaming::registry::ConnectionId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid parameter `{name}`: {constraint}")]
    InvalidParameter {
        name: &'static str,
        constraint: String,
    },

    #[error("seed source {} unavailable: {reason}", .path.display())]
    SeedUnavailable { path: PathBuf, reason: String },

    #[error("connection {0} lost")]
    ConnectionLost(ConnectionId),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn invalid_parameter(name: &'static str, constraint: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            constraint: constraint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message_names_constraint() {
        let err = ServiceError::invalid_parameter("page_size", "must be between 1 and 100");
        assert_eq!(
            err.to_string(),
            "invalid parameter `page_size`: must be between 1 and 100"
        );
    }

    #[test]
    fn test_seed_unavailable_message() {
        let err = ServiceError::SeedUnavailable {
            path: PathBuf::from("data/data.json"),
            reason: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "seed source data/data.json unavailable: not found");
    }
}
