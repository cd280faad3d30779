use std::str::FromStr;

use estimate_core::RepositoryError;
use rust_decimal::Decimal;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a money column. Values are written as TEXT, but INTEGER and REAL
/// cells (hand-edited rows, older exports) are accepted too. NULL reads as
/// zero.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let bad = |what: String| RepositoryError::Database(format!("money column '{column}': {what}"));

    let raw = row.try_get_raw(column).map_err(|e| bad(e.to_string()))?;
    if raw.is_null() {
        return Ok(Decimal::ZERO);
    }
    let storage = raw.type_info().name().to_owned();

    match storage.as_str() {
        "TEXT" => {
            let text: String = row.try_get(column).map_err(|e| bad(e.to_string()))?;
            Decimal::from_str(text.trim()).map_err(|e| bad(format!("'{text}' is not a number ({e})")))
        }
        "INTEGER" => row
            .try_get::<i64, _>(column)
            .map(Decimal::from)
            .map_err(|e| bad(e.to_string())),
        "REAL" => {
            let real: f64 = row.try_get(column).map_err(|e| bad(e.to_string()))?;
            Decimal::try_from(real).map_err(|e| bad(format!("{real} out of range ({e})")))
        }
        other => Err(bad(format!("unsupported storage class {other}"))),
    }
}

/// Binds a decimal as its exact string form.
pub fn decimal_to_text(d: Decimal) -> String {
    d.normalize().to_string()
}
