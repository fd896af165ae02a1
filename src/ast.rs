//! # Expression Language - Abstract Syntax Tree
//!
//! Filter and sort expressions select and order JSON documents. They look like
//! a small subset of JavaScript:
//!
//! ```text
//! _.size >= 3
//! _.tags.includes("red") && !(_.archived == 1)
//! _.tags.some(t => t.toUpperCase() == "RED")
//! like(_.name, "A%")
//! ```
//!
//! ## Modules
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - Binary and prefix operators
//! - **[expressions]** - The two node sorts and their smart constructors
//!
//! ## Two sorts
//!
//! Every node is either JSON-valued ([`JsonNode`]) or SQL-scalar-valued
//! ([`SqlNode`]). Property access works on JSON, comparison works on scalars,
//! and the boundary between them is always an explicit coercion node:
//!
//! - [`SqlNode::CoercedFromJson`] extracts the scalar of a JSON value
//! - [`JsonNode::CoercedFromSql`] wraps a scalar as a JSON value
//!
//! Keeping the sorts apart statically is what stops the compiler from encoding
//! a value as JSON twice. [`SqlNode::from_json`] and [`JsonNode::from_sql`]
//! never stack opposite coercions on top of each other.
//!
//! ## Identifiers
//!
//! - `_` - the document root
//! - `id` - the row identifier (a SQL integer, not a JSON path)
//! - closure parameters introduced by `some(x => ...)` / `every(x => ...)`
pub mod expressions;
pub mod operators;
pub mod tokens;

pub use expressions::{JsonNode, Number, SqlNode};
pub use operators::{BinOp, PrefixOp};
pub use tokens::{SpannedToken, Token};
