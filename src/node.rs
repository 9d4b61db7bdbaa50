//! Owned tree of one response's record rows.
//!
//! The shape follows the `resultset` body of the XML grammar:
//!
//! ```text
//! record @mod-id @record-id
//! ├── field @name
//! │   └── data*          raw text, one per repetition
//! └── relatedset @table
//!     └── record*        portal rows, same shape minus relatedset
//! ```
//!
//! Transport layers that already hold a parsed document can build these
//! directly; [`crate::response::Response`] fills them from XML text.

use crate::types::{FieldName, TableName};
use smol_str::SmolStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordNode {
    pub mod_id: Option<SmolStr>,
    pub record_id: Option<SmolStr>,
    pub fields: Vec<FieldNode>,
    pub related_sets: Vec<RelatedSetNode>,
}

impl RecordNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(mut self, mod_id: impl Into<SmolStr>, record_id: impl Into<SmolStr>) -> Self {
        self.mod_id = Some(mod_id.into());
        self.record_id = Some(record_id.into());
        self
    }

    pub fn with_field(mut self, field: FieldNode) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_related_set(mut self, related: RelatedSetNode) -> Self {
        self.related_sets.push(related);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    pub name: FieldName,
    pub data: Vec<String>,
}

impl FieldNode {
    pub fn new(name: impl Into<FieldName>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    pub fn with_data(mut self, raw: impl Into<String>) -> Self {
        self.data.push(raw.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedSetNode {
    pub table: TableName,
    pub records: Vec<RecordNode>,
}

impl RelatedSetNode {
    pub fn new(table: impl Into<TableName>) -> Self {
        Self {
            table: table.into(),
            records: Vec::new(),
        }
    }

    pub fn with_record(mut self, record: RecordNode) -> Self {
        self.records.push(record);
        self
    }
}
