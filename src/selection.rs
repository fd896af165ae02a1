//! Combines a filter expression and an ordering expression into the trailing
//! `WHERE ... ORDER BY ...` clause of a listing query.
//!
//! ```
//! use docexpr::{CompileOptions, Direction, Param, Selection};
//!
//! let clause = Selection::new(CompileOptions::default())
//!     .filter("_.size >= 3").unwrap()
//!     .order_by("_.name", Direction::Desc).unwrap()
//!     .build();
//!
//! assert_eq!(
//!     clause.sql,
//!     "WHERE ((data ->> '$.size') >= ?) ORDER BY (data ->> '$.name') DESC"
//! );
//! assert_eq!(clause.params, vec![Param::Integer(3)]);
//! ```

use std::{fmt, str::FromStr};

use crate::{
    error::{ErrorKind, ExprError, ExprResult},
    expr::{CompileOptions, compile_expr_with},
    value::Fragment,
};

/// Sort direction for [`Selection::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(ExprError::new(
                ErrorKind::Parse,
                format!("Invalid sort direction: {s}"),
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

/// Builder for a filter-and-order clause.
#[derive(Debug, Clone)]
pub struct Selection {
    options: CompileOptions,
    filter: Option<Fragment>,
    order: Option<(Fragment, Direction)>,
}

impl Selection {
    pub fn new(options: CompileOptions) -> Self {
        Selection {
            options,
            filter: None,
            order: None,
        }
    }

    /// Keep only documents for which `expression` holds.
    pub fn filter(mut self, expression: &str) -> ExprResult<Self> {
        self.filter = Some(compile_expr_with(expression, &self.options)?);
        Ok(self)
    }

    /// Order documents by the value of `expression`.
    pub fn order_by(mut self, expression: &str, direction: Direction) -> ExprResult<Self> {
        self.order = Some((compile_expr_with(expression, &self.options)?, direction));
        Ok(self)
    }

    /// The combined clause. Filter params come before order params, matching
    /// their placement in the SQL. Empty when nothing was added.
    pub fn build(self) -> Fragment {
        let mut out = Fragment::new();

        if let Some(filter) = &self.filter {
            out.push_str("WHERE ").push(filter);
        }

        if let Some((order, direction)) = &self.order {
            if !out.is_empty() {
                out.push_str(" ");
            }
            out.push_str("ORDER BY ")
                .push(order)
                .push_str(" ")
                .push_str(direction.sql());
        }

        out
    }
}
