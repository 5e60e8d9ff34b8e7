//! Structural and content validation of provider output.
//!
//! [`QualityValidator`] is pure: it never corrects a candidate, it only reports the
//! first rule that fails. Moving on to another provider is the cascade's job.

pub mod types;
pub mod validator;

#[cfg(test)]
mod tests;

pub use types::{Validation, ValidationFailure, ValidationRule};
pub use validator::{
    MIN_JUSTIFICATION_CHARS, QualityValidator, WEIGHTED_SUM_TOLERANCE,
};
