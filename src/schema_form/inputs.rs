//! Input-descriptor derivation
//!
//! Walks an object schema in field order and produces one descriptor per
//! rendered control. Nested objects are flattened into dotted names, and
//! described objects contribute a leading divider.

use tracing::{debug, trace};

use super::peel::{peel, Peeled};
use super::types::{
    is_hidden, strip_hidden_marker, DeriveOptions, InputDescriptor, InputOption, InputType, ObjectSchema, OutputName,
    Primitive, SchemaNode, StringFormat,
};
use crate::error::{FormError, Result};

/// State an object level hands down to its direct fields
#[derive(Clone, Debug, Default)]
struct Level {
    read_only: bool,
    hidden: bool,
    description: Option<String>,
}

/// Derive the ordered input descriptors of an object schema.
///
/// The root must be an object, optionally wrapped directly in `ReadOnly`.
/// `OutputName::Grouped` is rejected with `FormError::NotImplemented`.
pub fn derive_inputs(schema: &SchemaNode, options: &DeriveOptions) -> Result<Vec<InputDescriptor>> {
    if options.output_name == OutputName::Grouped {
        return Err(FormError::NotImplemented(
            "grouped output is not supported, use inline".to_string(),
        ));
    }

    let object = schema.as_root_object()?;
    let Peeled { modifiers, .. } = peel(schema);
    let level = Level {
        read_only: modifiers.read_only,
        hidden: modifiers.is_hidden(),
        description: modifiers.description().map(str::to_string),
    };

    let inputs = derive_level(object, &level, options);
    debug!(inputs = inputs.len(), "Derived inputs");
    Ok(inputs)
}

fn derive_level(object: &ObjectSchema, level: &Level, options: &DeriveOptions) -> Vec<InputDescriptor> {
    let mut inputs = Vec::with_capacity(object.fields.len() + 1);

    if options.object.description {
        if let Some(description) = &level.description {
            inputs.push(InputDescriptor::divider(description.clone(), level.read_only));
        }
    }

    for (name, field) in &object.fields {
        inputs.extend(derive_field(name, field, level, options));
    }

    inputs
}

fn derive_field(
    name: &str,
    field: &SchemaNode,
    level: &Level,
    options: &DeriveOptions,
) -> Vec<InputDescriptor> {
    let Peeled { node, modifiers } = peel(field);

    let mut input = InputDescriptor::new(name, level.read_only || modifiers.read_only);
    let mut hidden = level.hidden;
    if hidden {
        input.input_type = Some(InputType::Hidden);
    }

    // Once hidden, a field stays hidden; otherwise the innermost text wins.
    for text in &modifiers.descriptions {
        if hidden || is_hidden(text) {
            hidden = true;
            input.input_type = Some(InputType::Hidden);
        } else {
            input.placeholder = Some(text.clone());
        }
    }

    if hidden {
        trace!(field = name, "Hidden field");
        return vec![input];
    }

    match node {
        SchemaNode::Primitive(Primitive::String(format)) => {
            input.input_type = Some(string_input_type(*format, options));
        }
        SchemaNode::Primitive(Primitive::Number) => input.input_type = Some(InputType::Number),
        SchemaNode::Primitive(Primitive::Boolean) => input.input_type = Some(InputType::Checkbox),
        SchemaNode::Union(variants) => {
            input.input_type = Some(InputType::Select);
            input.options = Some(union_options(variants));
        }
        SchemaNode::Object(nested) => {
            // Only the object's own description heads its level
            let nested_level = Level {
                read_only: input.read_only,
                hidden: false,
                description: nested
                    .description
                    .as_deref()
                    .filter(|text| !text.is_empty())
                    .map(|text| strip_hidden_marker(text).to_string()),
            };
            trace!(field = name, fields = nested.fields.len(), "Flattening nested object");
            return derive_level(nested, &nested_level, options)
                .into_iter()
                .map(|nested_input| nested_input.nest_under(name))
                .collect();
        }
        SchemaNode::Literal(_) | SchemaNode::Wrapper(_) => {}
    }

    trace!(field = name, input_type = ?input.input_type, "Classified field");
    vec![input]
}

fn string_input_type(format: StringFormat, options: &DeriveOptions) -> InputType {
    match format {
        StringFormat::Url => InputType::Url,
        StringFormat::Email => InputType::Email,
        f if f.is_identifier() && options.string.identifiers_hidden => InputType::Hidden,
        _ => InputType::Text,
    }
}

/// Build select options from the literal variants of a union
fn union_options(variants: &[SchemaNode]) -> Vec<InputOption> {
    variants
        .iter()
        .filter_map(|variant| {
            let Peeled { node, modifiers } = peel(variant);
            let SchemaNode::Literal(literal) = node else {
                return None;
            };
            let value = literal.to_string();
            let label = modifiers
                .description()
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| value.clone());
            Some(InputOption { label, value })
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(schema: &SchemaNode) -> Vec<InputDescriptor> {
        derive_inputs(schema, &DeriveOptions::default()).unwrap()
    }

    #[test]
    fn test_string_formats() {
        let schema = SchemaNode::object([
            ("name", SchemaNode::string()),
            ("email", SchemaNode::string().email()),
            ("picture", SchemaNode::string().url()),
            ("id", SchemaNode::string().uuid().optional()),
        ]);
        let types: Vec<_> = derive(&schema).into_iter().map(|i| i.input_type).collect();
        assert_eq!(
            types,
            vec![
                Some(InputType::Text),
                Some(InputType::Email),
                Some(InputType::Url),
                Some(InputType::Text),
            ]
        );
    }

    #[test]
    fn test_identifiers_hidden_option() {
        let schema = SchemaNode::object([
            ("cuid", SchemaNode::string().cuid().optional()),
            ("cuid2", SchemaNode::string().cuid2().optional()),
            ("uuid", SchemaNode::string().uuid().optional()),
            ("ulid", SchemaNode::string().ulid().optional()),
            ("name", SchemaNode::string()),
        ]);
        let mut options = DeriveOptions::default();
        options.string.identifiers_hidden = true;
        let inputs = derive_inputs(&schema, &options).unwrap();
        for input in &inputs[..4] {
            assert_eq!(input.input_type, Some(InputType::Hidden));
        }
        assert_eq!(inputs[4].input_type, Some(InputType::Text));
    }

    #[test]
    fn test_innermost_description_is_placeholder() {
        let schema = SchemaNode::object([(
            "name",
            SchemaNode::string().describe("Inner").optional().describe("Outer"),
        )]);
        assert_eq!(derive(&schema)[0].placeholder.as_deref(), Some("Inner"));
    }

    #[test]
    fn test_hidden_is_sticky() {
        let schema = SchemaNode::object([(
            "token",
            SchemaNode::number().describe("Visible").hidden("Token").describe("Outer"),
        )]);
        let input = &derive(&schema)[0];
        assert_eq!(input.input_type, Some(InputType::Hidden));
        // Only the outer text precedes the marker
        assert_eq!(input.placeholder.as_deref(), Some("Outer"));
    }

    #[test]
    fn test_literal_field_has_no_type() {
        let schema = SchemaNode::object([("kind", SchemaNode::literal("USER").readonly())]);
        let input = &derive(&schema)[0];
        assert_eq!(input.name, "kind");
        assert!(input.read_only);
        assert_eq!(input.input_type, None);
    }

    #[test]
    fn test_union_skips_non_literals() {
        let schema = SchemaNode::object([(
            "choice",
            SchemaNode::union([
                SchemaNode::literal(1),
                SchemaNode::string(),
                SchemaNode::literal(true).describe("Yes").optional(),
            ]),
        )]);
        let input = &derive(&schema)[0];
        assert_eq!(input.input_type, Some(InputType::Select));
        assert_eq!(
            input.options.as_deref(),
            Some(
                &[
                    InputOption { label: "1".into(), value: "1".into() },
                    InputOption { label: "Yes".into(), value: "true".into() },
                ][..]
            )
        );
    }

    #[test]
    fn test_nested_divider_name() {
        let schema = SchemaNode::object([(
            "outer",
            SchemaNode::object([(
                "inner",
                SchemaNode::object([("leaf", SchemaNode::boolean())]).describe("Inner"),
            )]),
        )]);
        let names: Vec<_> = derive(&schema).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["outer.inner", "outer.inner.leaf"]);
    }

    #[test]
    fn test_described_wrapper_on_object_has_no_divider() {
        let schema = SchemaNode::object([(
            "address",
            SchemaNode::object([("street", SchemaNode::string())])
                .optional()
                .describe("Address"),
        )]);
        let inputs = derive(&schema);
        assert_eq!(inputs.len(), 1);
        assert!(!inputs[0].is_divider());
        assert_eq!(inputs[0].name, "address.street");
    }

    #[test]
    fn test_wrapped_object_keeps_own_description() {
        let schema = SchemaNode::object([(
            "address",
            SchemaNode::object([("street", SchemaNode::string())])
                .describe("Address")
                .optional()
                .describe("Outer"),
        )]);
        let inputs = derive(&schema);
        assert_eq!(inputs.len(), 2);
        assert!(inputs[0].is_divider());
        assert_eq!(inputs[0].name, "address");
        assert_eq!(inputs[0].placeholder.as_deref(), Some("Address"));
    }

    #[test]
    fn test_hidden_object_field_is_single_input() {
        let schema = SchemaNode::object([(
            "meta",
            SchemaNode::object([("a", SchemaNode::string()), ("b", SchemaNode::string())])
                .hidden("Meta"),
        )]);
        let inputs = derive(&schema);
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "meta");
        assert_eq!(inputs[0].input_type, Some(InputType::Hidden));
    }

    #[test]
    fn test_hidden_root_hides_every_field() {
        let schema = SchemaNode::object([
            ("a", SchemaNode::string()),
            ("b", SchemaNode::boolean().describe("B")),
        ])
        .hidden("Internal");
        let inputs = derive(&schema);
        assert!(inputs[0].is_divider());
        assert_eq!(inputs[0].placeholder.as_deref(), Some("Internal"));
        assert!(inputs[1..]
            .iter()
            .all(|i| i.input_type == Some(InputType::Hidden)));
    }

    #[test]
    fn test_grouped_not_implemented() {
        let schema = SchemaNode::object([("a", SchemaNode::string())]);
        let options = DeriveOptions {
            output_name: OutputName::Grouped,
            ..Default::default()
        };
        assert!(matches!(
            derive_inputs(&schema, &options),
            Err(FormError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_invalid_roots() {
        let options = DeriveOptions::default();
        assert!(matches!(
            derive_inputs(&SchemaNode::number(), &options),
            Err(FormError::InvalidSchema(_))
        ));
        let described = SchemaNode::object([("a", SchemaNode::string())]).optional();
        assert!(matches!(
            derive_inputs(&described, &options),
            Err(FormError::InvalidSchema(_))
        ));
    }
}
