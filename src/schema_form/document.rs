//! Serialized schema documents
//!
//! Loads schema trees from JSON or YAML documents. Every node is tagged by
//! `kind`:
//!
//! ```json
//! {
//!   "kind": "object",
//!   "description": "User",
//!   "fields": {
//!     "id": { "kind": "default", "generator": "uuid_v4",
//!             "inner": { "kind": "string", "format": "uuid" } },
//!     "email": { "kind": "described", "text": "Email",
//!                "inner": { "kind": "string", "format": "email" } },
//!     "status": { "kind": "union", "variants": [
//!         { "kind": "literal", "value": "active" },
//!         { "kind": "literal", "value": "inactive" } ] }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use super::types::{
    DefaultValue, LiteralValue, Modifier, ObjectSchema, Primitive, PropertyPath, SchemaNode,
    StringFormat,
};
use crate::error::{FormError, Result};

/// Serialized form of a schema node
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDocument {
    String {
        #[serde(default)]
        format: StringFormat,
    },
    Number,
    Boolean,
    Literal {
        value: LiteralDocument,
    },
    Object {
        #[serde(default, deserialize_with = "unique_fields")]
        fields: IndexMap<String, NodeDocument>,
        #[serde(default)]
        description: Option<String>,
    },
    Union {
        variants: Vec<NodeDocument>,
    },
    Optional {
        inner: Box<NodeDocument>,
    },
    Readonly {
        inner: Box<NodeDocument>,
    },
    Default {
        inner: Box<NodeDocument>,
        #[serde(default)]
        value: Option<Value>,
        #[serde(default)]
        generator: Option<ValueGenerator>,
    },
    Described {
        inner: Box<NodeDocument>,
        text: String,
    },
}

/// Literal value; symbols are written as `{ "symbol": "description" }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LiteralDocument {
    Boolean(bool),
    Number(serde_json::Number),
    String(String),
    Symbol { symbol: String },
}

impl From<LiteralDocument> for LiteralValue {
    fn from(doc: LiteralDocument) -> Self {
        match doc {
            LiteralDocument::Boolean(b) => LiteralValue::Boolean(b),
            LiteralDocument::Number(n) => LiteralValue::Number(n),
            LiteralDocument::String(s) => LiteralValue::String(s),
            LiteralDocument::Symbol { symbol } => LiteralValue::Symbol(symbol),
        }
    }
}

/// Named producers for defaults that change on every derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueGenerator {
    UuidV4,
}

impl ValueGenerator {
    fn into_default(self) -> DefaultValue {
        match self {
            ValueGenerator::UuidV4 => {
                DefaultValue::generated(|| Value::String(uuid::Uuid::new_v4().to_string()))
            }
        }
    }
}

impl NodeDocument {
    /// Convert into a schema tree; `path` locates errors
    pub fn into_node(self, path: &PropertyPath) -> Result<SchemaNode> {
        let node = match self {
            NodeDocument::String { format } => SchemaNode::Primitive(Primitive::String(format)),
            NodeDocument::Number => SchemaNode::number(),
            NodeDocument::Boolean => SchemaNode::boolean(),
            NodeDocument::Literal { value } => SchemaNode::Literal(value.into()),
            NodeDocument::Object {
                fields,
                description,
            } => {
                let fields = fields
                    .into_iter()
                    .map(|(name, doc)| {
                        let node = doc.into_node(&path.push_property(&name))?;
                        Ok((name, node))
                    })
                    .collect::<Result<Vec<_>>>()?;
                SchemaNode::Object(ObjectSchema {
                    fields,
                    description,
                })
            }
            NodeDocument::Union { variants } => SchemaNode::Union(
                variants
                    .into_iter()
                    .map(|variant| variant.into_node(path))
                    .collect::<Result<Vec<_>>>()?,
            ),
            NodeDocument::Optional { inner } => inner.into_node(path)?.optional(),
            NodeDocument::Readonly { inner } => inner.into_node(path)?.readonly(),
            NodeDocument::Default {
                inner,
                value,
                generator,
            } => {
                let default = match (value, generator) {
                    (Some(value), None) => DefaultValue::constant(value),
                    (None, Some(generator)) => generator.into_default(),
                    _ => {
                        return Err(FormError::Document {
                            path: display_path(path),
                            reason: "default needs exactly one of `value` or `generator`"
                                .to_string(),
                        })
                    }
                };
                inner.into_node(path)?.wrap(Modifier::Default(default))
            }
            NodeDocument::Described { inner, text } => {
                inner.into_node(path)?.wrap(Modifier::Described(text))
            }
        };
        Ok(node)
    }
}

fn display_path(path: &PropertyPath) -> String {
    if path.is_root() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

/// Deserialize object fields, rejecting repeated names
fn unique_fields<'de, D>(deserializer: D) -> std::result::Result<IndexMap<String, NodeDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = IndexMap<String, NodeDocument>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of field names to schema nodes")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut fields = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, node)) = map.next_entry::<String, NodeDocument>()? {
                if fields.contains_key(&name) {
                    return Err(serde::de::Error::custom(format!("duplicate field '{}'", name)));
                }
                fields.insert(name, node);
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(FieldsVisitor)
}

// ============================================================================
// Loading
// ============================================================================

/// Parse a JSON schema document
pub fn parse_json(source: &str) -> Result<SchemaNode> {
    let doc: NodeDocument = serde_json::from_str(source)?;
    doc.into_node(&PropertyPath::root())
}

/// Parse a YAML schema document
pub fn parse_yaml(source: &str) -> Result<SchemaNode> {
    let doc: NodeDocument = serde_yaml::from_str(source)?;
    doc.into_node(&PropertyPath::root())
}

/// Load a schema document, choosing the format by file extension
pub fn load_document(path: &Path) -> Result<SchemaNode> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    if !matches!(ext, "json" | "yaml" | "yml") {
        return Err(FormError::UnsupportedFormat(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let parsed = if ext == "json" {
        parse_json(&content)
    } else {
        parse_yaml(&content)
    };

    parsed.map_err(|e| match e {
        FormError::Json(_) | FormError::Yaml(_) => FormError::Document {
            path: path.display().to_string(),
            reason: e.to_string(),
        },
        other => other,
    })
}

/// Load every JSON/YAML document in a directory, sorted by path
pub fn load_documents_from_dir(dir: &Path) -> Result<Vec<(PathBuf, SchemaNode)>> {
    let pattern = format!("{}/*", dir.display());
    let mut documents = Vec::new();

    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) => {
                if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                    if matches!(ext, "json" | "yaml" | "yml") {
                        let schema = load_document(&path)?;
                        documents.push((path, schema));
                    }
                }
            }
            Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
        }
    }

    documents.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(documents)
}

// ============================================================================
// Tests
// ============================================================================
