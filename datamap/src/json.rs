use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::StorageError;

pub fn parse_json_value<T: DeserializeOwned>(value: Value) -> Result<T, StorageError> {
    let value = serde_json::from_value(value)?;
    Ok(value)
}

pub fn to_json_value<T: Serialize>(value: T) -> Result<Value, StorageError> {
    let value = serde_json::to_value(value)?;
    Ok(value)
}
