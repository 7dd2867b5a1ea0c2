use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Create a missing required field error
    pub fn missing_required(field: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingRequired {
            field: field.into(),
            hint: hint.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Trait for validating configuration values
pub trait ConfigValidator<T: ?Sized> {
    /// Validate a configuration value
    fn validate(&self, value: &T) -> Result<(), ConfigError>;
}

/// Accepts only values from a fixed list, compared case-insensitively
pub struct OneOfValidator {
    pub field: &'static str,
    pub allowed: &'static [&'static str],
}

impl ConfigValidator<str> for OneOfValidator {
    fn validate(&self, value: &str) -> Result<(), ConfigError> {
        let lowered = value.to_lowercase();
        if self.allowed.contains(&lowered.as_str()) {
            return Ok(());
        }
        Err(ConfigError::invalid_value(
            self.field,
            value,
            format!("one of: {}", self.allowed.join(", ")),
        ))
    }
}

/// Inclusive numeric range validator
pub struct RangeValidator {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

impl ConfigValidator<usize> for RangeValidator {
    fn validate(&self, value: &usize) -> Result<(), ConfigError> {
        if *value < self.min || *value > self.max {
            return Err(ConfigError::invalid_value(
                self.field,
                value.to_string(),
                format!("value between {} and {}", self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_of_validator() {
        let validator = OneOfValidator {
            field: "log_format",
            allowed: &["compact", "json"],
        };

        assert!(validator.validate("json").is_ok());
        assert!(validator.validate("JSON").is_ok());

        let err = validator.validate("xml").unwrap_err();
        assert!(err.to_string().contains("one of: compact, json"));
    }

    #[test]
    fn test_range_validator() {
        let validator = RangeValidator {
            field: "max_depth",
            min: 1,
            max: 10,
        };

        assert!(validator.validate(&1).is_ok());
        assert!(validator.validate(&10).is_ok());
        assert!(matches!(
            validator.validate(&0),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
