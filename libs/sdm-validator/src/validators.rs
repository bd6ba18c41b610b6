//! Field validators
//!
//! Each validator is a pure predicate over one stored value. Nullability is a
//! property of the validator, so the same field can be checked strictly in
//! one model and loosely in another.

use crate::validator::{IssueCode, ValidationIssue};
use indivo_models::FieldValue;
use std::fmt;

pub trait FieldValidator: fmt::Debug + Send + Sync {
    fn check(&self, value: &FieldValue, field: &str) -> Result<(), ValidationIssue>;
}

/// Value must equal one fixed reference value.
#[derive(Debug, Clone, PartialEq)]
pub struct ExactValueValidator {
    expected: FieldValue,
    nullable: bool,
}

impl ExactValueValidator {
    pub fn new(expected: impl Into<FieldValue>) -> Self {
        Self {
            expected: expected.into(),
            nullable: false,
        }
    }

    pub fn nullable(expected: impl Into<FieldValue>) -> Self {
        Self {
            expected: expected.into(),
            nullable: true,
        }
    }
}

impl FieldValidator for ExactValueValidator {
    fn check(&self, value: &FieldValue, field: &str) -> Result<(), ValidationIssue> {
        if self.nullable && value.is_null() {
            return Ok(());
        }
        if *value == self.expected {
            return Ok(());
        }
        Err(ValidationIssue::new(
            field,
            IssueCode::Value,
            format!("value {value} must be exactly '{}'", self.expected),
        ))
    }
}

/// Value must be a member of an enumerated set.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueInSetValidator {
    allowed: Vec<FieldValue>,
    nullable: bool,
}

impl ValueInSetValidator {
    pub fn new<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            nullable: false,
        }
    }

    pub fn nullable<I, V>(allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        Self {
            nullable: true,
            ..Self::new(allowed)
        }
    }

    pub fn allowed(&self) -> &[FieldValue] {
        &self.allowed
    }
}

impl FieldValidator for ValueInSetValidator {
    fn check(&self, value: &FieldValue, field: &str) -> Result<(), ValidationIssue> {
        if self.nullable && value.is_null() {
            return Ok(());
        }
        if self.allowed.contains(value) {
            return Ok(());
        }
        Err(ValidationIssue::new(
            field,
            IssueCode::Value,
            format!(
                "value {value} is not one of the {} allowed values",
                self.allowed.len()
            ),
        ))
    }
}

/// Value must be present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonNullValidator;

impl FieldValidator for NonNullValidator {
    fn check(&self, value: &FieldValue, field: &str) -> Result<(), ValidationIssue> {
        if value.is_null() {
            return Err(ValidationIssue::new(
                field,
                IssueCode::Required,
                "value may not be null",
            ));
        }
        Ok(())
    }
}
