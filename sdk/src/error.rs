//! SDK error types.
//!
//! Provides error types for listing validation.

/// SDK errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    /// Listing name is empty.
    #[error("listing name cannot be empty")]
    EmptyName,

    /// Listing price is negative.
    #[error("invalid price for {name}: {price}")]
    NegativePrice {
        /// Listing name.
        name: String,
        /// Offending price as received.
        price: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SdkError::NegativePrice {
            name: "AK-47 | Redline".to_string(),
            price: "-1.50".to_string(),
        };
        assert_eq!(err.to_string(), "invalid price for AK-47 | Redline: -1.50");
    }

    #[test]
    fn test_error_empty_name() {
        assert_eq!(SdkError::EmptyName.to_string(), "listing name cannot be empty");
    }
}
