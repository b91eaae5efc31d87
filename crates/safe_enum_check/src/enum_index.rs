//! Enum type name -> legal values, built from the whole catalog.

use safe_enum_protocol::Schema;
use std::collections::HashMap;

/// Request-scoped lookup of enum declarations.
///
/// Built once from every schema before any query is scanned, so a query may
/// reference an enum declared in any schema. When two schemas declare the
/// same enum name the later declaration wins.
#[derive(Debug, Clone, Default)]
pub struct EnumIndex {
    values: HashMap<String, Vec<String>>,
}

impl EnumIndex {
    pub fn build(schemas: &[Schema]) -> Self {
        let mut values = HashMap::new();
        for schema in schemas {
            for declaration in &schema.enums {
                values.insert(declaration.name.clone(), declaration.vals.clone());
            }
        }
        Self { values }
    }

    /// Legal values of `enum_type` in declaration order
    pub fn get(&self, enum_type: &str) -> Option<&[String]> {
        self.values.get(enum_type).map(Vec::as_slice)
    }

    /// Exact, case-sensitive membership test. `None` when the type is unknown.
    pub fn contains(&self, enum_type: &str, value: &str) -> Option<bool> {
        self.get(enum_type)
            .map(|vals| vals.iter().any(|v| v == value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
