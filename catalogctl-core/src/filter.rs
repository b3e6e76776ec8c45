//! Filter expressions for the hosted search service.
//!
//! The service accepts a small SQL-like syntax: `field = 'value'` joined with
//! `AND`. Expressions are always built from structured parts here; field
//! names must be identifier paths and values are quoted with `'` and `\`
//! escaped, so caller-supplied text can never change the expression shape.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::{CatalogError, Result};
use crate::model::{Category, Difficulty};

static FIELD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap());

/// A structured filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `field = 'value'`
    Eq { field: String, value: String },
    /// All conditions must hold
    And(Vec<Filter>),
}

impl Filter {
    /// Equality condition on an arbitrary field
    pub fn eq(field: &str, value: impl Into<String>) -> Result<Self> {
        if !FIELD_PATTERN.is_match(field) {
            return Err(CatalogError::InvalidFilterField {
                field: field.to_string(),
            });
        }
        Ok(Filter::Eq {
            field: field.to_string(),
            value: value.into(),
        })
    }

    /// `category = '<category>'`
    pub fn category(category: Category) -> Self {
        Filter::Eq {
            field: "category".into(),
            value: category.as_str().into(),
        }
    }

    /// `difficulty = '<difficulty>'`
    pub fn difficulty(difficulty: Difficulty) -> Self {
        Filter::Eq {
            field: "difficulty".into(),
            value: difficulty.as_str().into(),
        }
    }

    /// Conjoin two filters, flattening nested `And`s
    pub fn and(self, other: Filter) -> Self {
        let mut parts = match self {
            Filter::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Filter::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Filter::And(parts)
    }

    /// Render the wire expression
    pub fn to_expression(&self) -> String {
        self.to_string()
    }
}

/// Quote a literal for the filter syntax
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Eq { field, value } => write!(f, "{} = {}", field, quote_literal(value)),
            Filter::And(parts) => {
                let nested = parts.len() > 1;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    match part {
                        Filter::And(_) if nested => write!(f, "({})", part)?,
                        _ => write!(f, "{}", part)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Filter {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_expression())
    }
}
