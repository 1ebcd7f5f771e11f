use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Format checks beyond plain length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
}

/// Declarative rules for a single field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub required: bool,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub format: Option<Format>,
}

/// One violated rule. `value` carries the rule parameter ("3" for min=3),
/// empty when the rule has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub tag: String,
    pub value: String,
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl FieldRules {
    fn violation(&self, tag: &str, value: String) -> FieldError {
        FieldError {
            field: self.field.to_string(),
            tag: tag.to_string(),
            value,
        }
    }

    /// Evaluate this field's rules against a raw value. An empty value on an
    /// optional field skips every rule; at most one violation is reported per
    /// field.
    pub fn check(&self, value: &str, errors: &mut Vec<FieldError>) {
        if value.is_empty() {
            if self.required {
                errors.push(self.violation("required", String::new()));
            }
            return;
        }
        let len = value.chars().count();
        if let Some(min) = self.min {
            if len < min {
                errors.push(self.violation("min", min.to_string()));
                return;
            }
        }
        if let Some(max) = self.max {
            if len > max {
                errors.push(self.violation("max", max.to_string()));
                return;
            }
        }
        if let Some(Format::Email) = self.format {
            if !is_valid_email(value) {
                errors.push(self.violation("email", String::new()));
            }
        }
    }
}

/// Run a ruleset over (field name, value) pairs. A rule whose field has no
/// supplied value is evaluated against the empty string.
pub fn validate(rules: &[FieldRules], values: &[(&str, &str)]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for rule in rules {
        let value = values
            .iter()
            .find(|(field, _)| *field == rule.field)
            .map(|(_, v)| *v)
            .unwrap_or("");
        rule.check(value, &mut errors);
    }
    errors
}
