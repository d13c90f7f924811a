use serde::Serialize;
use std::fmt;

/// A single problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-scoped validation problems collected for redisplay.
///
/// Validation never aborts a request: callers inspect this value and show the
/// messages inline next to the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn require(&mut self, field: &'static str, value: Option<&str>) {
        if is_blank(value) {
            self.add(field, "can't be blank");
        }
    }

    pub fn require_inclusion(&mut self, field: &'static str, value: Option<&str>, allowed: &[&str]) {
        if !value.is_some_and(|value| allowed.contains(&value)) {
            self.add(field, "is not included in the list");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: &str) -> impl Iterator<Item = &FieldError> {
        self.0.iter().filter(move |error| error.field == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.for_field(field).next().is_some()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{} {}", error.field, error.message))
            .collect();
        f.write_str(&messages.join(" "))
    }
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_and_inclusion() {
        let mut errors = ValidationErrors::new();
        errors.require("token", Some("  "));
        errors.require("name", Some("Joan"));
        errors.require_inclusion("country", Some("ZZ"), &["FI", "US"]);
        errors.require_inclusion("other", None, &["FI"]);

        assert!(errors.has_field("token"));
        assert_eq!(errors.for_field("country").count(), 1);
        assert!(!errors.has_field("name"));
        assert_eq!(
            errors.to_string(),
            "token can't be blank country is not included in the list other is not included in the list"
        );
    }
}
