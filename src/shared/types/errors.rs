use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    /// The record exists but lacks the data an operation needs.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Shorthand for the common "entity with id=... not found" case.
    pub fn not_found_by_id(entity: &'static str, id: &str) -> Self {
        DomainError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found_by_id("Customer", "abc");
        assert_eq!(err.to_string(), "Not found: Customer with id=abc");
    }

    #[test]
    fn insufficient_data_is_distinct_from_not_found() {
        let err = DomainError::InsufficientData("no consumption".into());
        assert!(!matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.to_string(), "Insufficient data: no consumption");
    }
}
