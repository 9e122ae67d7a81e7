use rusqlite::types::Type;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Reads a JSON text column. `null` and empty text read as the default value.
pub fn json_column<T>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T>
where
    T: DeserializeOwned + Default,
{
    let text: String = row.get(idx)?;
    if text.is_empty() || text == "null" {
        return Ok(T::default());
    }
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(value)?)
}
