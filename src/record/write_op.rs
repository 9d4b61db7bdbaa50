use super::Record;
use crate::error::RecordError;
use crate::types::FieldName;
use crate::value::FmValue;
use smol_str::SmolStr;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Write access (dirty overlay only)
    // ════════════════════════════════════════════════════════════════════════

    /// Assign a field. The snapshot is left alone; the value is recorded in
    /// the dirty overlay under the declared field name, replacing any earlier
    /// assignment of the same field.
    pub fn set(&mut self, name: &str, value: impl Into<FmValue>) -> Result<(), RecordError> {
        let declared = self
            .field_name(name)
            .cloned()
            .ok_or_else(|| RecordError::InvalidField(SmolStr::new(name)))?;
        self.dirty.insert(declared, value.into());
        Ok(())
    }

    /// Pending value of a field, if it was assigned.
    pub fn dirty_value(&self, name: &str) -> Option<&FmValue> {
        self.dirty.get(name)
    }

    #[inline]
    pub fn is_changed(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Names of assigned fields in first-assignment order.
    pub fn changed(&self) -> Vec<&FieldName> {
        self.dirty.keys().collect()
    }
}
