//! Typed, dirty-tracking records over `fmresultset` XML responses.
//!
//! A [`ResultSet`] holds the field metadata of one response and its
//! [`Record`]s. Each record casts its raw `data` strings through the
//! declared field types, keeps related-table rows as portals, and collects
//! assignments in a dirty overlay next to the untouched snapshot.
//!
//! Field and portal names are matched ignoring case, with `_` equal to a
//! space and an optional leading `:`, so `"Ca Id"` answers to `"ca_id"` too.

pub mod cast;
pub mod error;
pub mod indifferent;
pub mod metadata;
mod model;
pub mod node;
pub mod record;
pub mod response;
pub mod resultset;
pub mod types;
pub mod value;

pub use cast::CastConfig;
pub use error::RecordError;
pub use indifferent::IndifferentMap;
pub use metadata::{FieldDefinition, FieldKind, FieldRegistry, FieldResult, PortalRegistry};
pub use record::{Record, Schema};
pub use response::{Datasource, Response};
pub use resultset::ResultSet;
pub use types::FieldName;
pub use value::FmValue;

#[doc(hidden)]
pub use paste;
