//! Core types for schema-driven form derivation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{FormError, Result};

/// Description prefix that marks a field as a hidden input
pub const HIDDEN_MARKER: &str = "_ih_";

/// Check whether a description carries the hidden marker
pub fn is_hidden(text: &str) -> bool {
    text.starts_with(HIDDEN_MARKER)
}

/// Remove the hidden marker so the text can be shown to a user
pub fn strip_hidden_marker(text: &str) -> &str {
    text.strip_prefix(HIDDEN_MARKER).unwrap_or(text)
}

// ============================================================================
// Schema Nodes
// ============================================================================

/// Format refinement of a string primitive
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    #[default]
    Plain,
    Email,
    Url,
    Uuid,
    Cuid,
    Cuid2,
    Ulid,
}

impl StringFormat {
    /// Machine-generated identifier formats
    pub fn is_identifier(&self) -> bool {
        matches!(
            self,
            StringFormat::Uuid | StringFormat::Cuid | StringFormat::Cuid2 | StringFormat::Ulid
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    String(StringFormat),
    Number,
    Boolean,
}

/// Value of a literal schema node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LiteralValue {
    String(String),
    Number(serde_json::Number),
    Boolean(bool),
    /// Symbol literal, holding its description
    Symbol(String),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::String(s) => f.write_str(s),
            // Whole floats print without a fraction, as `1` rather than `1.0`
            LiteralValue::Number(n) => match n.as_f64().filter(|_| n.is_f64()) {
                Some(float) => write!(f, "{}", float),
                None => write!(f, "{}", n),
            },
            LiteralValue::Boolean(b) => write!(f, "{}", b),
            LiteralValue::Symbol(desc) => write!(f, "Symbol({})", desc),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Number(value.into())
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Number(value.into())
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => LiteralValue::Number(n),
            // NaN and infinities have no JSON number form
            None => LiteralValue::String(value.to_string()),
        }
    }
}

/// Lazily produced default value.
///
/// The producer is evaluated on every derivation call and never cached, so
/// generators (timestamps, identifiers) yield a fresh value each time.
#[derive(Clone)]
pub struct DefaultValue(Arc<dyn Fn() -> Value + Send + Sync>);

impl DefaultValue {
    /// Default that always yields the same value
    pub fn constant(value: Value) -> Self {
        Self(Arc::new(move || value.clone()))
    }

    /// Default computed by a producer function
    pub fn generated<F>(producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(producer))
    }

    /// Evaluate the producer
    pub fn produce(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultValue(..)")
    }
}

/// Modifier layer attached around another node
#[derive(Clone, Debug)]
pub enum Modifier {
    Optional,
    ReadOnly,
    Default(DefaultValue),
    Described(String),
}

#[derive(Clone, Debug)]
pub struct Wrapper {
    pub modifier: Modifier,
    pub inner: Box<SchemaNode>,
}

/// Object schema with fields in declaration order
#[derive(Clone, Debug, Default)]
pub struct ObjectSchema {
    pub fields: Vec<(String, SchemaNode)>,
    pub description: Option<String>,
}

/// A node of a declarative schema tree
#[derive(Clone, Debug)]
pub enum SchemaNode {
    Primitive(Primitive),
    Literal(LiteralValue),
    Object(ObjectSchema),
    Union(Vec<SchemaNode>),
    Wrapper(Wrapper),
}

impl SchemaNode {
    pub fn string() -> Self {
        SchemaNode::Primitive(Primitive::String(StringFormat::Plain))
    }

    pub fn number() -> Self {
        SchemaNode::Primitive(Primitive::Number)
    }

    pub fn boolean() -> Self {
        SchemaNode::Primitive(Primitive::Boolean)
    }

    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        SchemaNode::Literal(value.into())
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        SchemaNode::Literal(LiteralValue::Symbol(description.into()))
    }

    /// Build an object schema; iteration order becomes field order
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        SchemaNode::Object(ObjectSchema {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            description: None,
        })
    }

    pub fn union<I>(variants: I) -> Self
    where
        I: IntoIterator<Item = SchemaNode>,
    {
        SchemaNode::Union(variants.into_iter().collect())
    }

    /// Wrap this node in a modifier layer
    pub fn wrap(self, modifier: Modifier) -> Self {
        SchemaNode::Wrapper(Wrapper {
            modifier,
            inner: Box::new(self),
        })
    }

    pub fn optional(self) -> Self {
        self.wrap(Modifier::Optional)
    }

    pub fn readonly(self) -> Self {
        self.wrap(Modifier::ReadOnly)
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.wrap(Modifier::Default(DefaultValue::constant(value.into())))
    }

    pub fn default_with<F>(self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.wrap(Modifier::Default(DefaultValue::generated(producer)))
    }

    /// Attach a description.
    ///
    /// A bare object keeps the text as its own description; every other
    /// node gets a `Described` layer.
    pub fn describe(self, text: impl Into<String>) -> Self {
        match self {
            SchemaNode::Object(mut object) => {
                object.description = Some(text.into());
                SchemaNode::Object(object)
            }
            other => other.wrap(Modifier::Described(text.into())),
        }
    }

    /// Describe with the hidden marker prepended
    pub fn hidden(self, text: impl AsRef<str>) -> Self {
        self.describe(format!("{}{}", HIDDEN_MARKER, text.as_ref()))
    }

    // Format refinements only apply to a bare string node.

    pub fn email(self) -> Self {
        self.with_format(StringFormat::Email)
    }

    pub fn url(self) -> Self {
        self.with_format(StringFormat::Url)
    }

    pub fn uuid(self) -> Self {
        self.with_format(StringFormat::Uuid)
    }

    pub fn cuid(self) -> Self {
        self.with_format(StringFormat::Cuid)
    }

    pub fn cuid2(self) -> Self {
        self.with_format(StringFormat::Cuid2)
    }

    pub fn ulid(self) -> Self {
        self.with_format(StringFormat::Ulid)
    }

    fn with_format(mut self, format: StringFormat) -> Self {
        if let SchemaNode::Primitive(Primitive::String(current)) = &mut self {
            *current = format;
        }
        self
    }

    /// The node wrapped by this one, if any
    pub fn inner(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Wrapper(wrapper) => Some(&wrapper.inner),
            _ => None,
        }
    }

    /// Get the kind name as a string
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Primitive(Primitive::String(_)) => "string",
            SchemaNode::Primitive(Primitive::Number) => "number",
            SchemaNode::Primitive(Primitive::Boolean) => "boolean",
            SchemaNode::Literal(_) => "literal",
            SchemaNode::Object(_) => "object",
            SchemaNode::Union(_) => "union",
            SchemaNode::Wrapper(wrapper) => match wrapper.modifier {
                Modifier::Optional => "optional",
                Modifier::ReadOnly => "readonly",
                Modifier::Default(_) => "default",
                Modifier::Described(_) => "described",
            },
        }
    }

    /// Resolve the object a derivation starts from.
    ///
    /// Accepts a bare object or an object wrapped directly in `ReadOnly`.
    pub fn as_root_object(&self) -> Result<&ObjectSchema> {
        match self {
            SchemaNode::Object(object) => Ok(object),
            SchemaNode::Wrapper(Wrapper {
                modifier: Modifier::ReadOnly,
                inner,
            }) => match inner.as_ref() {
                SchemaNode::Object(object) => Ok(object),
                other => Err(FormError::InvalidSchema(format!(
                    "read-only root must wrap an object, found {}",
                    other.kind_name()
                ))),
            },
            other => Err(FormError::InvalidSchema(format!(
                "expected an object schema, found {}",
                other.kind_name()
            ))),
        }
    }
}

// ============================================================================
// Property Path
// ============================================================================

/// Dotted property path (e.g. "user.address.city")
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Create a root path (empty)
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Push a property segment
    pub fn push_property(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(name.to_string());
        new
    }

}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

// ============================================================================
// Input Descriptors
// ============================================================================

/// Kind of form control an input renders as
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Url,
    Hidden,
    Number,
    Checkbox,
    Select,
    Divider,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Hidden => "hidden",
            InputType::Number => "number",
            InputType::Checkbox => "checkbox",
            InputType::Select => "select",
            InputType::Divider => "divider",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Choice of a select input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOption {
    pub label: String,
    pub value: String,
}

/// Rendering description of one form control
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    /// Dotted path of the field
    pub name: String,
    pub read_only: bool,
    /// Left unset for terminals with no control mapping
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<InputOption>>,
}

impl InputDescriptor {
    pub fn new(name: impl Into<String>, read_only: bool) -> Self {
        Self {
            name: name.into(),
            read_only,
            ..Default::default()
        }
    }

    /// Heading marker for a described object at the current level
    pub fn divider(placeholder: impl Into<String>, read_only: bool) -> Self {
        Self {
            name: String::new(),
            read_only,
            input_type: Some(InputType::Divider),
            placeholder: Some(placeholder.into()),
            options: None,
        }
    }

    /// Re-root the descriptor name under a parent field.
    ///
    /// Field names join as `parent.name` verbatim, empty keys included. An
    /// unnamed divider takes the parent path itself.
    pub fn nest_under(mut self, parent: &str) -> Self {
        self.name = if self.is_divider() && self.name.is_empty() {
            parent.to_string()
        } else {
            format!("{}.{}", parent, self.name)
        };
        self
    }

    pub fn is_divider(&self) -> bool {
        self.input_type == Some(InputType::Divider)
    }
}

/// Default-value record, nested the same way as the schema
pub type DefaultValues = serde_json::Map<String, Value>;

// ============================================================================
// Derivation Options
// ============================================================================

/// How nested objects appear in the output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputName {
    /// Flatten nested fields into dotted names
    #[default]
    Inline,
    /// Reserved; rejected with `NotImplemented`
    Grouped,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectOptions {
    /// Emit a divider for every described object
    pub description: bool,
}

impl Default for ObjectOptions {
    fn default() -> Self {
        Self { description: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringOptions {
    /// Classify uuid/cuid/cuid2/ulid strings as hidden inputs
    pub identifiers_hidden: bool,
}

/// Options recognized by `derive_inputs`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveOptions {
    pub output_name: OutputName,
    pub object: ObjectOptions,
    pub string: StringOptions,
}

// ============================================================================
// Tests
// ============================================================================
