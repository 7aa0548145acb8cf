//! # schema2form
//!
//! Derives form artifacts from declarative schema trees: a default-value
//! record shaped like the schema, and an ordered list of input descriptors
//! ready for rendering.
//!
//! ## Features
//!
//! - **Modifier peeling**: optional, read-only, default and description layers in any order
//! - **Nested objects**: flattened into dotted names with divider markers for described objects
//! - **Unions of literals**: rendered as selects with labelled options
//! - **Hidden inputs**: descriptions starting with `_ih_` render as hidden fields
//! - **Documents**: schemas loaded from JSON or YAML files
//!
//! ## Quick Start
//!
//! ```rust
//! use schema2form::{derive_default_values, derive_inputs, DeriveOptions, InputType, SchemaNode};
//!
//! let schema = SchemaNode::object([
//!     ("firstName", SchemaNode::string().default_value("John").optional()),
//!     ("age", SchemaNode::number().default_value(25)),
//! ]);
//!
//! let defaults = derive_default_values(&schema)?;
//! assert_eq!(defaults["firstName"], "John");
//! assert_eq!(defaults["age"], 25);
//!
//! let inputs = derive_inputs(&schema, &DeriveOptions::default())?;
//! assert_eq!(inputs[0].name, "firstName");
//! assert_eq!(inputs[1].input_type, Some(InputType::Number));
//! # Ok::<(), schema2form::FormError>(())
//! ```
//!
//! ## Architecture
//!
//! - **schema_form**: node model, peeling and the two derivations
//! - **config**: layered settings for the command-line tool
//! - **cli**: argument parsing and command execution

pub mod cli;
pub mod config;
pub mod error;
pub mod schema_form;

pub use error::{FormError, Result};
pub use schema_form::{
    derive_default_values, derive_inputs, DefaultValues, DeriveOptions, InputDescriptor,
    InputOption, InputType, SchemaNode,
};
