//! Argument validation for command handlers
//!
//! Two layers run before a handler sees its params: structural guards on the
//! raw args ([`guards`]), then field picking and JSON Schema validation
//! ([`merge_validate`]).

pub mod guards;
pub mod merge_validate;

pub use merge_validate::{
    pick_fields, MergeValidate, ValidateOptions, ValidateRequest, ValidationFailure, Violation,
};
