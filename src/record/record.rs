use super::builder::RecordBuilder;
use crate::cast::CastConfig;
use crate::error::RecordError;
use crate::indifferent::IndifferentMap;
use crate::metadata::{FieldRegistry, PortalRegistry, portal_registry};
use crate::node::RecordNode;
use crate::value::FmValue;
use serde::Serialize;
use smol_str::SmolStr;

// ─── Schema ─────────────────────────────────────────────────────────────────

/// Everything needed to materialize records of one response: the top-level
/// registry, the per-portal registries and the date/time formats.
#[derive(Debug, Clone, Copy)]
pub struct Schema<'a> {
    pub fields: &'a FieldRegistry,
    pub portal_fields: &'a PortalRegistry,
    pub config: &'a CastConfig,
}

impl<'a> Schema<'a> {
    pub fn new(
        fields: &'a FieldRegistry,
        portal_fields: &'a PortalRegistry,
        config: &'a CastConfig,
    ) -> Self {
        Self {
            fields,
            portal_fields,
            config,
        }
    }

    /// Registry governing a row: the portal's own when `portal_table` is set.
    pub fn registry_for(&self, portal_table: Option<&str>) -> Result<&'a FieldRegistry, RecordError> {
        match portal_table {
            Some(table) => portal_registry(self.portal_fields, table),
            None => Ok(self.fields),
        }
    }
}

// ─── Record ─────────────────────────────────────────────────────────────────

/// One materialized row.
///
/// `fields` is the snapshot the server returned and never changes after
/// construction. Assignments land in `dirty` instead, keyed by the declared
/// field name, until an outside save writes them back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub(crate) mod_id: Option<SmolStr>,
    pub(crate) record_id: Option<SmolStr>,
    pub(crate) fields: IndifferentMap<FmValue>,
    #[serde(skip_serializing_if = "IndifferentMap::is_empty")]
    pub(crate) portals: IndifferentMap<Vec<Record>>,
    #[serde(skip_serializing_if = "IndifferentMap::is_empty")]
    pub(crate) dirty: IndifferentMap<FmValue>,
}

impl Record {
    /// Materialize one record node.
    ///
    /// `portal_table` marks the node as a portal row of that related table,
    /// which switches casting to the portal's registry. Child rows of every
    /// `relatedset` are built recursively and owned by this record.
    pub fn from_node(
        node: &RecordNode,
        schema: &Schema<'_>,
        portal_table: Option<&str>,
    ) -> Result<Self, RecordError> {
        let registry = schema.registry_for(portal_table)?;
        let mut builder = RecordBuilder::new(
            node.mod_id.clone(),
            node.record_id.clone(),
            node.fields.len(),
        );

        for field in &node.fields {
            let definition = registry.lookup(&field.name)?;
            let value =
                definition.cast_occurrences(field.data.iter().map(String::as_str), schema.config)?;
            builder.raw_set(definition.name.clone(), value);
        }

        for related in &node.related_sets {
            tracing::trace!(
                table = %related.table,
                rows = related.records.len(),
                "building portal"
            );
            builder.touch_portal(&related.table);
            for child in &related.records {
                let child = Record::from_node(child, schema, Some(related.table.as_str()))?;
                builder.push_portal(&related.table, child);
            }
        }

        Ok(builder.build())
    }

    #[inline]
    pub fn mod_id(&self) -> Option<&str> {
        self.mod_id.as_deref()
    }

    #[inline]
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// Snapshot of the values as fetched.
    #[inline]
    pub fn fields(&self) -> &IndifferentMap<FmValue> {
        &self.fields
    }

    #[inline]
    pub fn portals(&self) -> &IndifferentMap<Vec<Record>> {
        &self.portals
    }

    /// Rows of one portal, looked up like a field name.
    pub fn portal(&self, table: &str) -> Option<&[Record]> {
        self.portals.get(table).map(Vec::as_slice)
    }

    /// Mutable rows of one portal, for assigning into related records.
    pub fn portal_mut(&mut self, table: &str) -> Option<&mut [Record]> {
        self.portals.get_mut(table).map(Vec::as_mut_slice)
    }

    #[inline]
    pub fn dirty(&self) -> &IndifferentMap<FmValue> {
        &self.dirty
    }
}

impl std::ops::Index<&str> for Record {
    type Output = FmValue;

    fn index(&self, name: &str) -> &FmValue {
        match self.get(name) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}
