use holidays_common::error::Error;
use sea_orm::{
    DbErr,
    sea_query::{self, Alias, Expr, Keyword, SimpleExpr, Value},
};

use crate::statements::ColumnKind;

pub(crate) fn db_error_to_domain(e: DbErr) -> Error {
    Error::Database(e.to_string())
}

pub(crate) fn query_error_to_domain(e: sea_query::error::Error) -> Error {
    Error::Internal(format!("Failed to build statement: {e}"))
}

/// Converts one staged cell into the SQL expression inserted for it.
/// Empty cells are an untyped NULL, which Postgres accepts for any column.
pub(crate) fn cell_to_value(kind: &ColumnKind, cell: &str) -> Result<SimpleExpr, Error> {
    if cell.is_empty() {
        return Ok(SimpleExpr::Keyword(Keyword::Null));
    }

    let mismatch =
        || Error::InvalidInput(format!("Value {cell:?} does not fit column kind {kind:?}"));

    let value = match kind {
        ColumnKind::Boolean => parse_bool(cell).map(Value::from).ok_or_else(mismatch)?,
        ColumnKind::BigInt => cell
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| mismatch())?,
        ColumnKind::Double => cell
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| mismatch())?,
        ColumnKind::Text => Value::from(cell.to_string()),
        ColumnKind::Other(udt_name) => {
            return Ok(Expr::val(cell.to_string()).cast_as(Alias::new(udt_name)));
        }
    };

    Ok(SimpleExpr::from(value))
}

pub(crate) fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "true" => Some(true),
        "False" | "false" => Some(false),
        _ => None,
    }
}
