pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod optimizer;
pub mod output;
pub mod parser;
pub mod selection;
pub mod source;
pub mod value;

pub use ast::{BinOp, JsonNode, Number, PrefixOp, SqlNode, Token};
pub use compiler::{Binding, Env, compile};
pub use error::{ErrorKind, ExprError, ExprResult};
pub use expr::{CompileOptions, compile_expr, compile_expr_with, parse_expr, parse_expr_with};
pub use lexer::{Lexer, tokenize};
pub use optimizer::{optimize_json, optimize_sql};
pub use parser::{Parser, parse};
pub use selection::{Direction, Selection};
pub use value::{Fragment, Param};
