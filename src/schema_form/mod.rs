//! Schema-Driven Form Derivation
//!
//! Walks a declarative schema tree and derives:
//! - Default values: a record mirroring the schema's shape
//! - Inputs: ordered form-control descriptors with dotted names

pub mod types;
pub mod peel;
pub mod defaults;
pub mod inputs;
pub mod document;

pub use types::*;
pub use peel::{peel, peel_with, Modifiers, Peeled};
pub use defaults::derive_default_values;
pub use inputs::derive_inputs;
pub use document::{load_document, load_documents_from_dir, parse_json, parse_yaml};
