use crate::plan::ValidationPlan;
use crate::validators::FieldValidator;
use indexmap::IndexMap;
use indivo_models::FieldValue;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Validators attached to the named fields of one model. Every validator
/// on a field must pass.
#[derive(Debug, Default)]
pub struct FieldValidators {
    fields: IndexMap<String, Vec<Box<dyn FieldValidator>>>,
}

impl FieldValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, validator: impl FieldValidator + 'static) -> Self {
        self.add(field, validator);
        self
    }

    pub fn add(&mut self, field: &str, validator: impl FieldValidator + 'static) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(Box::new(validator));
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run every validator of `field` against `value`.
    pub fn check_field(&self, field: &str, value: &FieldValue) -> Vec<ValidationIssue> {
        self.fields
            .get(field)
            .into_iter()
            .flatten()
            .filter_map(|v| v.check(value, field).err())
            .collect()
    }
}

pub struct Validator {
    plan: ValidationPlan,
}

impl Validator {
    pub fn new(plan: ValidationPlan) -> Self {
        Self { plan }
    }

    /// Validate the stored values of one instance. Fields without a stored
    /// value are checked as null.
    pub fn validate(
        &self,
        model: &str,
        validators: &FieldValidators,
        values: &IndexMap<String, FieldValue>,
    ) -> ValidationOutcome {
        ValidationRun::new(&self.plan, model, validators, values).execute()
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationPlan::default())
    }
}

struct ValidationRun<'a> {
    plan: &'a ValidationPlan,
    model: &'a str,
    validators: &'a FieldValidators,
    values: &'a IndexMap<String, FieldValue>,
    issues: Vec<ValidationIssue>,
}

impl<'a> ValidationRun<'a> {
    fn new(
        plan: &'a ValidationPlan,
        model: &'a str,
        validators: &'a FieldValidators,
        values: &'a IndexMap<String, FieldValue>,
    ) -> Self {
        Self {
            plan,
            model,
            validators,
            values,
            issues: Vec::new(),
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        let null = FieldValue::Null;
        for field in self.validators.fields() {
            if self.plan.fail_fast && !self.issues.is_empty() {
                break;
            }
            if self.issues.len() >= self.plan.max_issues {
                break;
            }

            let value = self.values.get(field).unwrap_or(&null);
            for issue in self.validators.check_field(field, value) {
                warn!(model = self.model, field, reason = %issue.reason, "validation failed");
                self.issues.push(issue);
            }
        }
        self.issues.truncate(self.plan.max_issues);

        ValidationOutcome {
            model: self.model.to_string(),
            valid: self.issues.is_empty(),
            issues: self.issues,
        }
    }
}

/// Validation result for a single instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub model: String,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    /// Issues for one field, in validator order.
    pub fn issues_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.field == field)
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "model": self.model,
            "valid": self.valid,
            "issues": self.issues.iter().map(ValidationIssue::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub code: IssueCode,
    pub reason: String,
}

impl ValidationIssue {
    pub fn new(field: &str, code: IssueCode, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code,
            reason: reason.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "field": self.field,
            "code": self.code.to_string(),
            "reason": self.reason,
        })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCode {
    Required,
    Value,
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Value => write!(f, "value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{ExactValueValidator, NonNullValidator, ValueInSetValidator};

    fn status_validators() -> FieldValidators {
        FieldValidators::new()
            .with("status", NonNullValidator)
            .with("status", ValueInSetValidator::new(["active", "resolved"]))
            .with("system", ExactValueValidator::new("http://snomed/"))
    }

    #[test]
    fn fail_fast_stops_after_first_failing_field() {
        let values = IndexMap::new();
        let strict = Validator::new(ValidationPlan::builder().fail_fast(true).build().unwrap());
        let outcome = strict.validate("Problem", &status_validators(), &values);

        assert!(!outcome.valid);
        assert!(outcome.issues.iter().all(|i| i.field == "status"));
    }

    #[test]
    fn max_issues_caps_the_report() {
        let values = IndexMap::new();
        let capped = Validator::new(ValidationPlan::builder().max_issues(1).build().unwrap());
        let outcome = capped.validate("Problem", &status_validators(), &values);
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn outcome_serializes_issue_list() {
        let mut values = IndexMap::new();
        values.insert("status".to_string(), FieldValue::from("active"));
        values.insert("system".to_string(), FieldValue::from("http://other/"));

        let outcome = Validator::default().validate("Problem", &status_validators(), &values);
        let json = outcome.to_json();
        assert_eq!(json["valid"], false);
        assert_eq!(json["issues"][0]["field"], "system");
        assert_eq!(json["issues"][0]["code"], "value");
    }
}
