//! The schema validation gate on the JSON-upload path.
//!
//! Ordering is fixed: the payload has already parsed by the time this gate
//! runs; the gate then fetches `schema.json` from the pre-partition dataset
//! directory, parses it, compiles it, and validates the instance. Any step
//! failing short-circuits the rest and the subsequent write. The schema is
//! fetched fresh on every call — no caching between requests.

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::{
    errors::GatewayError,
    store::{self, DirectoryHandle, StoreError},
};

/// Well-known object name of the validation schema in the dataset root.
pub const SCHEMA_OBJECT: &str = "schema.json";

/// Validate `instance` against the dataset's stored schema.
pub async fn validate_against_schema(
    dataset: &DirectoryHandle,
    instance: &Value,
) -> Result<(), GatewayError> {
    let schema = fetch_schema(dataset).await?;

    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| GatewayError::InvalidSchemaDefinition(err.to_string()))?;

    if let Err(mut violations) = compiled.validate(instance) {
        if let Some(violation) = violations.next() {
            let schema_pointer = violation.schema_path.to_string();
            let rule = schema_pointer
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string();
            let rule_definition = schema
                .pointer(&schema_pointer)
                .map(Value::to_string)
                .unwrap_or_default();
            return Err(GatewayError::SchemaViolation {
                message: format!("JSON schema validation error: {violation}"),
                name: instance_name(&violation.instance_path.to_string()),
                rule,
                rule_definition,
            });
        }
    }

    Ok(())
}

/// Fetch and parse `schema.json` from the dataset root.
///
/// A missing schema is the caller's 404; a schema that exists but does not
/// parse is an operator error, surfaced as 500 by the classifier.
async fn fetch_schema(dataset: &DirectoryHandle) -> Result<Value, GatewayError> {
    let stream = match dataset.download(SCHEMA_OBJECT).await {
        Ok(stream) => stream,
        Err(StoreError::NotFound(_)) => return Err(GatewayError::SchemaMissing),
        Err(err) => {
            return Err(GatewayError::upstream(
                "schema could not be retrieved for validation",
                err,
            ));
        }
    };

    let raw = store::read_to_end(stream)
        .await
        .map_err(|err| GatewayError::upstream("schema could not be read", err.into()))?;

    serde_json::from_slice(&raw).map_err(|err| GatewayError::MalformedSchema(err.to_string()))
}

/// Dotted path of the offending property, rooted at `data` so a violation
/// at the document root still names something.
fn instance_name(pointer: &str) -> String {
    format!("data{}", pointer.replace('/', "."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_names_are_rooted_at_data() {
        assert_eq!(instance_name(""), "data");
        assert_eq!(instance_name("/age"), "data.age");
        assert_eq!(instance_name("/items/0/id"), "data.items.0.id");
    }
}
