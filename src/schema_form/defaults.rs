//! Default-value derivation

use serde_json::{json, Value};
use tracing::{debug, trace};

use super::peel::{peel, Peeled};
use super::types::{DefaultValues, ObjectSchema, Primitive, SchemaNode};
use crate::error::Result;

/// Derive the default-value record of an object schema.
///
/// String, number and boolean fields take their `Default` value or fall back
/// to `""`, `0` and `false`. Nested objects produce nested records. Literal
/// and union fields have no entry.
pub fn derive_default_values(schema: &SchemaNode) -> Result<DefaultValues> {
    let object = schema.as_root_object()?;
    debug!(fields = object.fields.len(), "Deriving default values");
    Ok(object_defaults(object))
}

fn object_defaults(object: &ObjectSchema) -> DefaultValues {
    let mut values = DefaultValues::new();

    for (name, field) in &object.fields {
        let Peeled { node, modifiers } = peel(field);

        let value = match node {
            SchemaNode::Primitive(Primitive::String(_)) => modifiers
                .default_value()
                .unwrap_or_else(|| Value::String(String::new())),
            SchemaNode::Primitive(Primitive::Number) => {
                modifiers.default_value().unwrap_or_else(|| json!(0))
            }
            SchemaNode::Primitive(Primitive::Boolean) => {
                modifiers.default_value().unwrap_or(Value::Bool(false))
            }
            SchemaNode::Object(nested) => Value::Object(object_defaults(nested)),
            SchemaNode::Literal(_) | SchemaNode::Union(_) | SchemaNode::Wrapper(_) => {
                trace!(field = %name, kind = node.kind_name(), "No default for field");
                continue;
            }
        };

        values.insert(name.clone(), value);
    }

    values
}

// ============================================================================
// Tests
// ============================================================================
