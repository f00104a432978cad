use super::schema::FieldId;
use thiserror::Error;

/// Rejected field update.
///
/// A failed update never touches the record or the error map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field `{field}` is a {expected} field, got {got} input")]
    InvalidFieldKind {
        field: FieldId,
        expected: &'static str,
        got: &'static str,
    },

    #[error("`{value}` is not an option of field `{field}`")]
    InvalidOption { field: FieldId, value: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure to get a usable reply from the Application Intake API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidFieldKind {
            field: FieldId::Declaration1,
            expected: "boolean",
            got: "text",
        };
        assert_eq!(
            err.to_string(),
            "Field `declaration1` is a boolean field, got text input"
        );

        let err = DomainError::InvalidOption {
            field: FieldId::SkillLevel,
            value: "Expert".to_string(),
        };
        assert_eq!(err.to_string(), "`Expert` is not an option of field `skillLevel`");

        let err = SubmissionError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Transport failure: connection refused");
    }
}
