//! Output schemas: a response descriptor paired with the validator that
//! turns the service's JSON back into a Rust value.
//!
//! The descriptor is what the service is told to produce. The validator is
//! what the client actually trusts. [`OutputSchema::derive`] builds both from
//! one Rust type so they cannot drift apart; the other constructors accept
//! them separately and leave keeping them in sync to the caller.

use crate::error::ValidationError;
use schemars::generate::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Validator<T> = dyn Fn(Value) -> Result<T, ValidationError> + Send + Sync;

pub struct OutputSchema<T> {
    descriptor: Value,
    validator: Arc<Validator<T>>,
}

impl<T> OutputSchema<T> {
    /// Pair a descriptor with a hand-written validator.
    pub fn new<F>(descriptor: Value, validator: F) -> Self
    where
        F: Fn(Value) -> Result<T, ValidationError> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            validator: Arc::new(validator),
        }
    }

    /// JSON-Schema-like document sent as `response_schema`.
    pub fn descriptor(&self) -> &Value {
        &self.descriptor
    }

    pub fn validate(&self, value: Value) -> Result<T, ValidationError> {
        (self.validator)(value)
    }
}

impl<T: DeserializeOwned + 'static> OutputSchema<T> {
    /// Use a caller-supplied descriptor with serde deserialization as the
    /// validator. Nothing checks that the two describe the same type.
    pub fn with_descriptor(descriptor: Value) -> Self {
        Self::new(descriptor, deserialize_value::<T>)
    }
}

impl<T: DeserializeOwned + JsonSchema + 'static> OutputSchema<T> {
    /// Derive the descriptor from `T` itself.
    pub fn derive() -> Self {
        Self::with_descriptor(response_schema_for::<T>())
    }
}

impl<T> Clone for OutputSchema<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            validator: Arc::clone(&self.validator),
        }
    }
}

impl<T> fmt::Debug for OutputSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputSchema")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Generate an inline, OpenAPI-flavoured schema for `T`.
///
/// The service rejects `$schema` and resolves `$ref` poorly, so the meta
/// schema is dropped and subschemas are inlined. Optional fields come out as
/// `nullable` rather than `["type", "null"]` unions.
pub fn response_schema_for<T: JsonSchema>() -> Value {
    let generator = SchemaSettings::openapi3()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator();

    generator.into_root_schema_for::<T>().to_value()
}

fn deserialize_value<T: DeserializeOwned>(value: Value) -> Result<T, ValidationError> {
    serde_path_to_error::deserialize(value).map_err(|e| ValidationError::Schema {
        path: e.path().to_string(),
        message: e.into_inner().to_string(),
    })
}
