//! Built-in attribute validators
//!
//! Validators run during config validation against known, non-null values.
//! Each returns error diagnostics pointing at the offending attribute.

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{Diagnostic, Dynamic};

/// Accepts only one of a fixed set of strings
pub struct StringOneOf {
    allowed: Vec<String>,
}

impl StringOneOf {
    pub fn create(allowed: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl Validator for StringOneOf {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.allowed.join(", "))
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::String(s) = &request.config_value {
            if !self.allowed.iter().any(|a| a == s) {
                response.diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid value for {}", request.path),
                        format!("{}. Got: {}", capitalize(&self.description()), s),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        response
    }
}

/// Bounds a number attribute
pub struct NumberRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRange {
    pub fn at_least(min: f64) -> Box<dyn Validator> {
        Box::new(Self {
            min: Some(min),
            max: None,
        })
    }
}

impl Validator for NumberRange {
    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("value must be between {} and {}", min, max),
            (Some(min), None) => format!("value must be at least {}", min),
            (None, Some(max)) => format!("value must be at most {}", max),
            (None, None) => "any number".to_string(),
        }
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::Number(n) = request.config_value {
            let too_small = self.min.is_some_and(|min| n < min);
            let too_large = self.max.is_some_and(|max| n > max);
            if too_small || too_large {
                response.diagnostics.push(
                    Diagnostic::error(
                        format!("{} out of range", request.path),
                        format!("{}, got {}", capitalize(&self.description()), n),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        response
    }
}

/// Rejects numbers with a fractional part
pub struct WholeNumber;

impl WholeNumber {
    pub fn create() -> Box<dyn Validator> {
        Box::new(Self)
    }
}

impl Validator for WholeNumber {
    fn description(&self) -> String {
        "value must be a whole number".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::Number(n) = request.config_value {
            if n.fract() != 0.0 {
                response.diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid value for {}", request.path),
                        format!("{}, got {}", capitalize(&self.description()), n),
                    )
                    .with_attribute(request.path),
                );
            }
        }
        response
    }
}

/// Requires an absolute URL
pub struct UrlValidator;

impl UrlValidator {
    pub fn create() -> Box<dyn Validator> {
        Box::new(Self)
    }
}

impl Validator for UrlValidator {
    fn description(&self) -> String {
        "value must be an absolute URL".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::String(s) = &request.config_value {
            if let Err(e) = url::Url::parse(s) {
                response.diagnostics.push(
                    Diagnostic::error(format!("Invalid URL for {}", request.path), e.to_string())
                        .with_attribute(request.path),
                );
            }
        }
        response
    }
}

/// Requires a UUID string
pub struct UuidValidator;

impl UuidValidator {
    pub fn create() -> Box<dyn Validator> {
        Box::new(Self)
    }
}

impl Validator for UuidValidator {
    fn description(&self) -> String {
        "value must be a UUID".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::String(s) = &request.config_value {
            if let Err(e) = uuid::Uuid::parse_str(s) {
                response.diagnostics.push(
                    Diagnostic::error(format!("Invalid UUID for {}", request.path), e.to_string())
                        .with_attribute(request.path),
                );
            }
        }
        response
    }
}

/// Requires a string holding a JSON object
pub struct JsonObjectValidator;

impl JsonObjectValidator {
    pub fn create() -> Box<dyn Validator> {
        Box::new(Self)
    }
}

impl Validator for JsonObjectValidator {
    fn description(&self) -> String {
        "value must be a JSON object".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut response = ValidatorResponse::default();
        if let Dynamic::String(s) = &request.config_value {
            if let Err(e) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(s) {
                response.diagnostics.push(
                    Diagnostic::error(format!("Invalid JSON for {}", request.path), e.to_string())
                        .with_attribute(request.path),
                );
            }
        }
        response
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;

    fn run(validator: &dyn Validator, value: Dynamic) -> Vec<Diagnostic> {
        validator
            .validate(ValidatorRequest {
                config_value: value,
                path: AttributePath::new("field"),
            })
            .diagnostics
    }

    #[test]
    fn test_one_of_accepts_listed_values() {
        let validator = StringOneOf::create(&["openai", "anthropic", "xai"]);
        assert!(run(validator.as_ref(), Dynamic::String("xai".to_string())).is_empty());

        let diags = run(validator.as_ref(), Dynamic::String("cohere".to_string()));
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags[0].detail,
            "Value must be one of: openai, anthropic, xai. Got: cohere"
        );
        assert_eq!(diags[0].attribute, Some(AttributePath::new("field")));
    }

    #[test]
    fn test_whole_number_rejects_fractions() {
        let validator = WholeNumber::create();
        assert!(run(validator.as_ref(), Dynamic::Number(300.0)).is_empty());
        assert!(run(validator.as_ref(), Dynamic::Null).is_empty());

        let diags = run(validator.as_ref(), Dynamic::Number(90.5));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].detail, "Value must be a whole number, got 90.5");
    }

    #[test]
    fn test_number_range_enforces_minimum() {
        let validator = NumberRange::at_least(60.0);
        assert!(run(validator.as_ref(), Dynamic::Number(60.0)).is_empty());
        assert!(run(validator.as_ref(), Dynamic::Number(300.0)).is_empty());

        let diags = run(validator.as_ref(), Dynamic::Number(59.0));
        assert_eq!(diags.len(), 1);
        assert!(diags[0].detail.contains("at least 60"));
    }

    #[test]
    fn test_url_validator_rejects_relative_urls() {
        let validator = UrlValidator::create();
        assert!(run(
            validator.as_ref(),
            Dynamic::String("https://auth.example.com/authorize".to_string())
        )
        .is_empty());
        assert_eq!(
            run(validator.as_ref(), Dynamic::String("/authorize".to_string())).len(),
            1
        );
    }

    #[test]
    fn test_uuid_validator() {
        let validator = UuidValidator::create();
        assert!(run(
            validator.as_ref(),
            Dynamic::String("6f1c1a4e-8d4b-4c4e-9b7e-2f5d3c1a0b9e".to_string())
        )
        .is_empty());
        assert_eq!(
            run(validator.as_ref(), Dynamic::String("not-a-uuid".to_string())).len(),
            1
        );
    }

    #[test]
    fn test_json_validator_requires_an_object() {
        let validator = JsonObjectValidator::create();
        assert!(run(
            validator.as_ref(),
            Dynamic::String(r#"{"token":"t"}"#.to_string())
        )
        .is_empty());
        assert_eq!(
            run(validator.as_ref(), Dynamic::String("{bad".to_string())).len(),
            1
        );
        assert_eq!(
            run(validator.as_ref(), Dynamic::String("[1,2]".to_string())).len(),
            1
        );
    }

    #[test]
    fn test_validators_ignore_other_types() {
        let validator = StringOneOf::create(&["a"]);
        assert!(run(validator.as_ref(), Dynamic::Bool(true)).is_empty());
    }
}
