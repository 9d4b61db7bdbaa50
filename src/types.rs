use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

/// Insertion-ordered map with the Fx hasher.
pub type FastIndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Field name exactly as the server declared it (`"Ca Id"`, `"line_items::qty"`).
pub type FieldName = SmolStr;

/// Related-table name of a portal (`relatedset@table`).
pub type TableName = SmolStr;

// ─── Key Normalization ──────────────────────────────────────────────────────

/// Prefix marking a symbol-style key (`":ca_id"`).
pub const SYMBOL_PREFIX: char = ':';

/// Normalize a field or table name for lookup.
///
/// A leading `:` is dropped, letters are lower-cased and `_` is folded into a
/// space, so `"Ca Id"`, `"ca_id"`, `"CA ID"` and `":ca_id"` all meet on
/// `"ca id"`. Only the first `:` goes: `"orders::total"` keeps its separator.
pub fn normalize_key(key: &str) -> SmolStr {
    let key = key.strip_prefix(SYMBOL_PREFIX).unwrap_or(key);
    key.chars()
        .flat_map(|c| {
            let c = if c == '_' { ' ' } else { c };
            c.to_lowercase()
        })
        .collect()
}
