//! Validator library for SDM model instances.

pub mod error;
pub mod plan;
pub mod validator;
pub mod validators;

pub use error::ConfigError;
pub use plan::{ValidationPlan, ValidationPlanBuilder, DEFAULT_MAX_ISSUES};
pub use validator::{
    FieldValidators, IssueCode, ValidationIssue, ValidationOutcome, Validator,
};
pub use validators::{
    ExactValueValidator, FieldValidator, NonNullValidator, ValueInSetValidator,
};
