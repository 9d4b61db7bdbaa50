use super::Record;
use crate::indifferent::IndifferentMap;
use crate::types::FieldName;
use crate::value::FmValue;
use smol_str::SmolStr;

// ─── Builder ────────────────────────────────────────────────────────────────

/// Construction phase of a [`Record`].
///
/// Raw assignment writes straight into the snapshot. [`build`](Self::build)
/// seals it and hands back a record whose dirty overlay is empty, so there is
/// no "ready" flag on the record itself.
pub(crate) struct RecordBuilder {
    mod_id: Option<SmolStr>,
    record_id: Option<SmolStr>,
    fields: IndifferentMap<FmValue>,
    portals: IndifferentMap<Vec<Record>>,
}

impl RecordBuilder {
    pub(crate) fn new(
        mod_id: Option<SmolStr>,
        record_id: Option<SmolStr>,
        field_count: usize,
    ) -> Self {
        Self {
            mod_id,
            record_id,
            fields: IndifferentMap::with_capacity(field_count),
            portals: IndifferentMap::new(),
        }
    }

    /// Store a cast value. A field listed twice in one node keeps the last.
    #[inline]
    pub(crate) fn raw_set(&mut self, name: FieldName, value: FmValue) {
        self.fields.insert(name, value);
    }

    /// Make sure `table` exists in the portal map even if it has no rows.
    #[inline]
    pub(crate) fn touch_portal(&mut self, table: &str) {
        self.portals.get_or_insert_with(table, Vec::new);
    }

    /// Append a child row; repeated related sets of one table accumulate.
    #[inline]
    pub(crate) fn push_portal(&mut self, table: &str, child: Record) {
        self.portals.get_or_insert_with(table, Vec::new).push(child);
    }

    pub(crate) fn build(self) -> Record {
        Record {
            mod_id: self.mod_id,
            record_id: self.record_id,
            fields: self.fields,
            portals: self.portals,
            dirty: IndifferentMap::new(),
        }
    }
}
