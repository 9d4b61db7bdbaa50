use crate::cast::{CastConfig, cast};
use crate::error::RecordError;
use crate::indifferent::IndifferentMap;
use crate::node::RecordNode;
use crate::types::{FieldName, TableName};
use crate::value::FmValue;
use smol_str::SmolStr;
use std::fmt;
use std::str::FromStr;

// ─── Field Result Types ─────────────────────────────────────────────────────

/// Declared result type of a field (`field-definition@result`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldResult {
    Text,
    Number,
    Date,
    Time,
    Timestamp,
    Container,
}

impl FieldResult {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldResult::Text => "text",
            FieldResult::Number => "number",
            FieldResult::Date => "date",
            FieldResult::Time => "time",
            FieldResult::Timestamp => "timestamp",
            FieldResult::Container => "container",
        }
    }
}

impl fmt::Display for FieldResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldResult {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(FieldResult::Text),
            "number" => Ok(FieldResult::Number),
            "date" => Ok(FieldResult::Date),
            "time" => Ok(FieldResult::Time),
            "timestamp" => Ok(FieldResult::Timestamp),
            "container" => Ok(FieldResult::Container),
            other => Err(RecordError::MalformedResponse(format!(
                "unknown field result type {other:?}"
            ))),
        }
    }
}

/// How the server computes a field (`field-definition@type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    #[default]
    Normal,
    Calculation,
    Summary,
}

impl FromStr for FieldKind {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(FieldKind::Normal),
            "calculation" => Ok(FieldKind::Calculation),
            "summary" => Ok(FieldKind::Summary),
            other => Err(RecordError::MalformedResponse(format!(
                "unknown field kind {other:?}"
            ))),
        }
    }
}

// ─── FieldDefinition ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub name: FieldName,
    pub result: FieldResult,
    pub kind: FieldKind,
    /// Declared repetitions; 1 for an ordinary field.
    pub max_repeat: u32,
    pub global: bool,
    pub not_empty: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<FieldName>, result: FieldResult) -> Self {
        Self {
            name: name.into(),
            result,
            kind: FieldKind::Normal,
            max_repeat: 1,
            global: false,
            not_empty: false,
        }
    }

    pub fn with_max_repeat(mut self, max_repeat: u32) -> Self {
        self.max_repeat = max_repeat.max(1);
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    #[inline]
    pub fn is_repeatable(&self) -> bool {
        self.max_repeat > 1
    }

    /// Cast one raw `data` occurrence to this field's declared type.
    #[inline]
    pub fn raw_cast(&self, raw: &str, config: &CastConfig) -> Result<FmValue, RecordError> {
        cast(raw, self.result, config).map_err(|reason| {
            tracing::warn!(field = %self.name, raw, %reason, "cast failed");
            RecordError::Cast {
                field: self.name.clone(),
                raw: raw.to_owned(),
                expected: self.result,
            }
        })
    }

    /// Cast every occurrence and collapse them to null, scalar or list.
    pub fn cast_occurrences<'r>(
        &self,
        raw: impl IntoIterator<Item = &'r str>,
        config: &CastConfig,
    ) -> Result<FmValue, RecordError> {
        let datum = raw
            .into_iter()
            .map(|r| self.raw_cast(r, config))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FmValue::from_occurrences(datum))
    }
}

// ─── FieldRegistry ──────────────────────────────────────────────────────────

/// Declared fields of one table, looked up case- and key-style-indifferently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRegistry {
    fields: IndifferentMap<FieldDefinition>,
}

/// Portal field registries keyed by related-table name.
pub type PortalRegistry = IndifferentMap<FieldRegistry>;

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition; a later definition for an equivalent name replaces it.
    pub fn define(&mut self, definition: FieldDefinition) {
        self.fields.insert(definition.name.clone(), definition);
    }

    /// Builder-style [`define`](Self::define).
    pub fn with(mut self, definition: FieldDefinition) -> Self {
        self.define(definition);
        self
    }

    /// The caster for `name`, or [`RecordError::UnknownField`].
    pub fn lookup(&self, name: &str) -> Result<&FieldDefinition, RecordError> {
        self.fields
            .get(name)
            .ok_or_else(|| RecordError::UnknownField(SmolStr::new(name)))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &FieldName> {
        self.fields.keys()
    }

    /// Check every field of `node` (and of its portal rows, against the
    /// matching registry in `portals`) before any value is cast.
    pub fn validate(&self, node: &RecordNode, portals: &PortalRegistry) -> Result<(), RecordError> {
        for field in &node.fields {
            self.lookup(&field.name)?;
        }
        for related in &node.related_sets {
            let registry = portal_registry(portals, &related.table)?;
            for child in &related.records {
                registry.validate(child, portals)?;
            }
        }
        Ok(())
    }
}

impl FromIterator<FieldDefinition> for FieldRegistry {
    fn from_iter<I: IntoIterator<Item = FieldDefinition>>(iter: I) -> Self {
        let mut registry = FieldRegistry::new();
        for definition in iter {
            registry.define(definition);
        }
        registry
    }
}

/// Registry of the portal `table`, or [`RecordError::UnknownPortal`].
pub fn portal_registry<'a>(
    portals: &'a PortalRegistry,
    table: &str,
) -> Result<&'a FieldRegistry, RecordError> {
    portals
        .get(table)
        .ok_or_else(|| RecordError::UnknownPortal(TableName::new(table)))
}
