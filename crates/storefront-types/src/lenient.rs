//! Field deserializers for values the remote API may send as `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` becomes `T::default()`; any other value must still parse as `T`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Anything other than a JSON string becomes the empty string.
pub(crate) fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}
