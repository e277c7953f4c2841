//! # Merge-Validate
//!
//! Argument validation for command handlers: merges the inbound args down to
//! an allowlisted field set, then validates the picked object against a
//! compiled JSON Schema.
//!
//! ## Overview
//!
//! Handlers receive free-form JSON argument objects. Before a handler acts on
//! them, it narrows the object to the fields it owns (`pick`) and checks the
//! result against its schema. Validation either stops at the first violation
//! (`abort_early`) or collects every violation so the caller sees the full
//! picture in one reply.
//!
//! ## Usage
//!
//! ```rust
//! use plugin_core::validation::{MergeValidate, ValidateOptions, ValidateRequest};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), plugin_core::PluginError> {
//! let schema = json!({
//!     "type": "object",
//!     "properties": { "field": { "type": "string" } },
//!     "required": ["field"]
//! });
//! let validator = MergeValidate::new(&schema)?;
//!
//! let args = json!({ "field": "value", "ignored": true });
//! let params = validator.validate(ValidateRequest {
//!     args: &args,
//!     pick: &["field"],
//!     options: ValidateOptions::default(),
//! })?;
//!
//! assert!(params.contains_key("field"));
//! assert!(!params.contains_key("ignored"));
//! # Ok(())
//! # }
//! ```

use crate::error::{PluginError, Result};
use crate::validation::guards;
use jsonschema::Validator;
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

/// Options controlling validation behavior
#[derive(Debug, Clone, Copy)]
pub struct ValidateOptions {
    /// Stop at the first violation instead of collecting all of them
    pub abort_early: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { abort_early: false }
    }
}

/// A single validation request: the raw args, the field allowlist, and options
#[derive(Debug, Clone, Copy)]
pub struct ValidateRequest<'a> {
    /// Inbound command arguments, expected to be a JSON object
    pub args: &'a Value,
    /// Top-level fields to retain; everything else is dropped before validation
    pub pick: &'a [&'a str],
    pub options: ValidateOptions,
}

/// One schema violation with its location in the validated instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// The full set of violations from a failed validation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

impl ValidationFailure {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Consumes self and returns the inner Vec
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A merge-validate instance with its schema compiled once at construction
pub struct MergeValidate {
    validator: Validator,
}

impl MergeValidate {
    /// Compile a JSON Schema (draft 2020-12) into a reusable validator
    pub fn new(schema: &Value) -> Result<Self> {
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(schema)
            .map_err(|e| {
                PluginError::ConfigurationError(format!("Invalid validation schema: {e}"))
            })?;

        Ok(Self { validator })
    }

    /// Pick the allowlisted fields from args and validate them against the schema
    ///
    /// Returns the picked object on success. On failure returns
    /// `PluginError::ValidationError` carrying one entry per violation, or
    /// `PluginError::InvalidInput` when the args fail structural checks.
    pub fn validate(&self, request: ValidateRequest<'_>) -> Result<Map<String, Value>> {
        let args_object = request.args.as_object().ok_or_else(|| {
            PluginError::InvalidInput("Command args must be a JSON object".to_string())
        })?;

        guards::check_args_value(request.args)?;

        let picked = Value::Object(pick_fields(args_object, request.pick));

        let violations: Vec<Violation> = if request.options.abort_early {
            match self.validator.validate(&picked) {
                Ok(()) => Vec::new(),
                Err(error) => vec![Violation {
                    instance_path: error.instance_path.to_string(),
                    schema_path: error.schema_path.to_string(),
                    message: error.to_string(),
                }],
            }
        } else {
            self.validator
                .iter_errors(&picked)
                .map(|error| Violation {
                    instance_path: error.instance_path.to_string(),
                    schema_path: error.schema_path.to_string(),
                    message: error.to_string(),
                })
                .collect()
        };

        if !violations.is_empty() {
            debug!(
                violation_count = violations.len(),
                abort_early = request.options.abort_early,
                "Args failed schema validation"
            );
            return Err(PluginError::ValidationError(ValidationFailure::new(
                violations,
            )));
        }

        let Value::Object(params) = picked else {
            return Err(PluginError::InvalidInput(
                "Picked args were not an object".to_string(),
            ));
        };

        Ok(params)
    }
}

/// Retain only the allowlisted top-level fields of an args object
///
/// Never invents or mutates values: the output keys are the intersection of
/// the pick list and the keys present in args.
pub fn pick_fields(args: &Map<String, Value>, pick: &[&str]) -> Map<String, Value> {
    let mut picked = Map::new();
    for field in pick {
        if let Some(value) = args.get(*field) {
            picked.insert((*field).to_string(), value.clone());
        }
    }
    picked
}
