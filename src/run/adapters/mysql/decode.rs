//! Conversion of MySQL result rows into JSON row maps.
//!
//! Statements run over the text protocol, so every non-null value arrives
//! as its textual rendering. The reported column type decides how that text
//! becomes JSON.

use crate::run::domain::RowMap;
use serde_json::{Number, Value};
use sqlx::mysql::{MySql, MySqlRow};
use sqlx::{Column, Decode, Row, TypeInfo, ValueRef};

/// Decodes every column of `row`, preserving column order.
pub(super) fn decode_row(row: &MySqlRow) -> Result<RowMap, sqlx::Error> {
    let mut map = RowMap::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        map.insert(column.name().to_owned(), value);
    }
    Ok(map)
}

fn decode_column(row: &MySqlRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_owned();
    let bytes = <&[u8] as Decode<'_, MySql>>::decode(raw).map_err(sqlx::Error::Decode)?;
    Ok(text_to_json(&type_name, bytes))
}

/// Interprets a text-protocol value of the named column type.
///
/// Values that do not parse as their declared type fall back to strings.
pub(super) fn text_to_json(type_name: &str, bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    let parsed = match type_name {
        "BOOLEAN" => text.parse::<i64>().ok().map(|flag| Value::Bool(flag != 0)),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            text.parse::<i64>().ok().map(Value::from)
        }
        unsigned if unsigned.ends_with(" UNSIGNED") => text.parse::<u64>().ok().map(Value::from),
        "FLOAT" | "DOUBLE" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        "JSON" => serde_json::from_slice::<Value>(bytes).ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| Value::String(text.into_owned()))
}
