//! JSON rendering of compiled fragments.
//!
//! # Examples
//!
//! ```
//! use docexpr::{compile_expr, output::to_json};
//!
//! let fragment = compile_expr(r#"_.tags.includes("red")"#, "data").unwrap();
//! assert_eq!(
//!     to_json(&fragment),
//!     r#"{"sql":"EXISTS (SELECT 1 FROM json_each((data -> '$.tags')) AS json_1 WHERE json_1.value = ?)","params":["red"]}"#
//! );
//! ```

use crate::value::Fragment;

/// Compact JSON: `{"sql": ..., "params": [...]}`.
pub fn to_json(fragment: &Fragment) -> String {
    serde_json::to_string(fragment).unwrap_or_default()
}

/// Pretty JSON with 2-space indentation.
pub fn to_json_pretty(fragment: &Fragment) -> String {
    serde_json::to_string_pretty(fragment).unwrap_or_default()
}
