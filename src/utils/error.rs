use crate::domain::model::{CertificateId, OrderId};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Order generation failed: {message}")]
    GenerationError { message: String },

    #[error("Invalid order at line {line}: {reason}")]
    InvalidOrderError { line: u64, reason: String },

    #[error("No orders to allocate")]
    EmptyInputError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Generation,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PackerError::ConfigValidationError { .. }
            | PackerError::InvalidConfigValueError { .. }
            | PackerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PackerError::CsvError(_)
            | PackerError::InvalidOrderError { .. }
            | PackerError::EmptyInputError => ErrorCategory::Input,
            PackerError::GenerationError { .. } => ErrorCategory::Generation,
            PackerError::IoError(_) | PackerError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PackerError::EmptyInputError => ErrorSeverity::Medium,
            PackerError::ConfigValidationError { .. }
            | PackerError::InvalidConfigValueError { .. }
            | PackerError::MissingConfigError { .. }
            | PackerError::CsvError(_)
            | PackerError::InvalidOrderError { .. }
            | PackerError::SerializationError(_) => ErrorSeverity::High,
            PackerError::GenerationError { .. } | PackerError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PackerError::ConfigValidationError { .. } => "Check the TOML syntax and section names",
            PackerError::InvalidConfigValueError { .. } => {
                "Fix the reported value on the command line or in the config file"
            }
            PackerError::MissingConfigError { .. } => "Add the missing field to the config file",
            PackerError::CsvError(_) | PackerError::InvalidOrderError { .. } => {
                "Input CSV must have the header id,amount,merchant_id and positive two-decimal amounts"
            }
            PackerError::EmptyInputError => "Provide at least one order",
            PackerError::GenerationError { .. } => "Re-run with a smaller merchant or order count",
            PackerError::IoError(_) => "Check that the file exists and is readable",
            PackerError::SerializationError(_) => "Re-run with --format text",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read orders: {}", self),
            ErrorCategory::Generation => format!("Could not generate orders: {}", self),
            ErrorCategory::Output => format!("Could not complete the run: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PackerError>;

/// Non-fatal integrity findings. Collected on the allocation and logged, never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    #[error("order {order_id} exceeds the certificate limit on its own: {amount} > {limit}")]
    OverCapacityOrder {
        order_id: OrderId,
        amount: Decimal,
        limit: Decimal,
    },

    #[error("certificate {certificate_id} exceeds the limit: {amount} > {limit}")]
    CertificateOverLimit {
        certificate_id: CertificateId,
        amount: Decimal,
        limit: Decimal,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_maps_to_exit_code() {
        let err = PackerError::GenerationError {
            message: "rng".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Generation);
        assert_eq!(err.exit_code(), 3);

        let err = PackerError::MissingConfigError {
            field: "allocation.limit".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);

        assert_eq!(PackerError::EmptyInputError.exit_code(), 2);
    }

    #[test]
    fn test_user_friendly_message_includes_detail() {
        let err = PackerError::InvalidOrderError {
            line: 7,
            reason: "amount must be positive".to_string(),
        };
        let msg = err.user_friendly_message();
        assert!(msg.starts_with("Could not read orders"));
        assert!(msg.contains("line 7"));
    }
}
