use super::Record;
use crate::error::RecordError;
use crate::types::FieldName;
use crate::value::FmValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use bigdecimal::BigDecimal;
use smol_str::SmolStr;

impl Record {
    // ════════════════════════════════════════════════════════════════════════
    // Read access
    // ════════════════════════════════════════════════════════════════════════

    /// Snapshot value of a field.
    ///
    /// Fails with [`RecordError::InvalidField`] when the name is not part of
    /// this record, whatever its case or key style. Pending assignments are
    /// not visible here; see [`dirty_value`](Self::dirty_value).
    #[inline]
    pub fn get(&self, name: &str) -> Result<&FmValue, RecordError> {
        self.fields
            .get(name)
            .ok_or_else(|| RecordError::InvalidField(SmolStr::new(name)))
    }

    /// Declared spelling of a field name, or `None` if the record lacks it.
    pub fn field_name(&self, name: &str) -> Option<&FieldName> {
        self.fields.get_key_value(name).map(|(k, _)| k)
    }

    #[inline]
    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Declared names in response order.
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &FieldName> {
        self.fields.keys()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Typed getters: Ok(None) for null or another type
    // ════════════════════════════════════════════════════════════════════════

    pub fn get_str(&self, name: &str) -> Result<Option<&str>, RecordError> {
        Ok(self.get(name)?.as_str())
    }

    pub fn get_decimal(&self, name: &str) -> Result<Option<&BigDecimal>, RecordError> {
        Ok(self.get(name)?.as_decimal())
    }

    pub fn get_date(&self, name: &str) -> Result<Option<NaiveDate>, RecordError> {
        Ok(self.get(name)?.as_date())
    }

    pub fn get_time(&self, name: &str) -> Result<Option<NaiveTime>, RecordError> {
        Ok(self.get(name)?.as_time())
    }

    pub fn get_timestamp(&self, name: &str) -> Result<Option<NaiveDateTime>, RecordError> {
        Ok(self.get(name)?.as_timestamp())
    }
}
