// ─── Error ──────────────────────────────────────────────────────────────────
use crate::metadata::FieldResult;
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// The metadata registry has no definition for this name.
    #[error("Unknown field: {0}")]
    UnknownField(SmolStr),
    /// Read or write of a name that is not part of the record's field set.
    #[error("Invalid field: {0}")]
    InvalidField(SmolStr),
    #[error("Cannot cast {raw:?} in field {field} to {expected}")]
    Cast {
        field: SmolStr,
        raw: String,
        expected: FieldResult,
    },
    #[error("Unknown portal table: {0}")]
    UnknownPortal(SmolStr),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),
}
