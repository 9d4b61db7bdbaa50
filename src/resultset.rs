use crate::cast::CastConfig;
use crate::error::RecordError;
use crate::metadata::{FieldRegistry, PortalRegistry};
use crate::node::RecordNode;
use crate::record::{Record, Schema};
use crate::response::{Datasource, Response};

// ─── ResultSet ──────────────────────────────────────────────────────────────

/// Every record of one response, in document order, with the metadata they
/// were cast from.
///
/// Construction is all-or-nothing: a single unknown field or bad value fails
/// the whole set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    fields: FieldRegistry,
    portal_fields: PortalRegistry,
    records: Vec<Record>,
    datasource: Option<Datasource>,
    error_code: u32,
    count: u64,
    fetch_size: u64,
}

impl ResultSet {
    /// Build from metadata and record nodes supplied by a transport layer.
    pub fn new(
        fields: FieldRegistry,
        portal_fields: PortalRegistry,
        nodes: &[RecordNode],
        config: &CastConfig,
    ) -> Result<Self, RecordError> {
        let records = build_records(&fields, &portal_fields, nodes, config)?;
        let count = records.len() as u64;
        Ok(Self {
            fields,
            portal_fields,
            records,
            datasource: None,
            error_code: 0,
            count,
            fetch_size: count,
        })
    }

    /// Build from a parsed [`Response`].
    ///
    /// `config` decides the date/time formats; pass
    /// [`CastConfig::from_datasource`] to use the ones the server announced.
    pub fn from_response(response: Response, config: &CastConfig) -> Result<Self, RecordError> {
        let records = build_records(
            &response.fields,
            &response.portal_fields,
            &response.records,
            config,
        )?;
        Ok(Self {
            fields: response.fields,
            portal_fields: response.portal_fields,
            records,
            datasource: response.datasource,
            error_code: response.error_code,
            count: response.count,
            fetch_size: response.fetch_size,
        })
    }

    /// Parse `fmresultset` XML and materialize its records.
    pub fn from_xml(xml: &str, config: &CastConfig) -> Result<Self, RecordError> {
        Self::from_response(Response::parse(xml)?, config)
    }

    #[inline]
    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    #[inline]
    pub fn portal_fields(&self) -> &PortalRegistry {
        &self.portal_fields
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records for assignment; only their dirty overlays can change.
    #[inline]
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn datasource(&self) -> Option<&Datasource> {
        self.datasource.as_ref()
    }

    pub fn error_code(&self) -> u32 {
        self.error_code
    }

    /// Rows found by the query (`resultset@count`).
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Rows returned in this response (`resultset@fetch-size`).
    pub fn fetch_size(&self) -> u64 {
        self.fetch_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

fn build_records(
    fields: &FieldRegistry,
    portal_fields: &PortalRegistry,
    nodes: &[RecordNode],
    config: &CastConfig,
) -> Result<Vec<Record>, RecordError> {
    let schema = Schema::new(fields, portal_fields, config);
    let records = nodes
        .iter()
        .map(|node| Record::from_node(node, &schema, None))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(records = records.len(), "built result set");
    Ok(records)
}

impl std::ops::Index<usize> for ResultSet {
    type Output = Record;

    fn index(&self, i: usize) -> &Record {
        &self.records[i]
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
