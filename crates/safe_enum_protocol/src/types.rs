//! Protocol payload types (sqlc `plugin.proto` equivalents)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields of a message that this crate does not model.
pub type Extra = Map<String, Value>;

// ============================================================================
// Request
// ============================================================================

/// The request sqlc sends to a codegen plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Schema metadata. sqlc omits it for empty projects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Catalog>,

    /// Named queries, in the order sqlc parsed them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<Query>,

    /// settings, sqlcVersion, pluginOptions, globalOptions, ...
    #[serde(flatten)]
    pub extra: Extra,
}

impl GenerateRequest {
    pub fn new(catalog: Catalog, queries: Vec<Query>) -> Self {
        Self {
            catalog: Some(catalog),
            queries,
            extra: Extra::new(),
        }
    }

    /// All schemas of the catalog, empty when no catalog was sent.
    pub fn schemas(&self) -> &[Schema] {
        self.catalog
            .as_ref()
            .map(|catalog| catalog.schemas.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schemas: Vec<Schema>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Catalog {
    pub fn new(schemas: Vec<Schema>) -> Self {
        Self {
            schemas,
            extra: Extra::new(),
        }
    }
}

/// A database schema (namespace) and the types declared in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<Enum>,

    /// tables, compositeTypes, comment
    #[serde(flatten)]
    pub extra: Extra,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enums: Vec::new(),
            extra: Extra::new(),
        }
    }

    /// Add an enum declaration
    pub fn with_enum(mut self, declaration: Enum) -> Self {
        self.enums.push(declaration);
        self
    }
}

/// An enum type declaration and its legal values, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vals: Vec<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Enum {
    pub fn new<I, S>(name: impl Into<String>, vals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            vals: vals.into_iter().map(Into::into).collect(),
            extra: Extra::new(),
        }
    }
}

/// One named query. Only `text` is ever rewritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// cmd, columns, params, comments, filename, insertIntoTable
    #[serde(flatten)]
    pub extra: Extra,
}

impl Query {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            extra: Extra::new(),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Files produced by a generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub files: Vec<File>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl GenerateResponse {
    /// A response that writes nothing
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A generated file. `contents` is base64 on the wire and is not decoded here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub contents: String,

    #[serde(flatten)]
    pub extra: Extra,
}
