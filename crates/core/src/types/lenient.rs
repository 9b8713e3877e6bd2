//! Tolerant deserializers for the remote API's loosely typed JSON.
//!
//! The API is backed by a database driver that returns most columns as
//! strings, so a count may arrive as `5` or `"5"`, a phone number as a
//! number, and absent text as `null`. These helpers are used with
//! `#[serde(deserialize_with = "...")]` on the model fields.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Any JSON scalar the API uses for identifiers, counts, and text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Unsigned(n) => n.to_string(),
            Self::Signed(n) => n.to_string(),
        }
    }
}

/// Deserialize a JSON string or integer into a `String`.
///
/// # Errors
///
/// Fails for `null`, booleans, floats, arrays, and objects.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer)
        .map(Scalar::into_text)
        .map_err(|_| D::Error::custom("expected a string or integer identifier"))
}

/// Deserialize a non-negative count from a number or a numeric string.
///
/// `null` and blank strings become the default (zero).
///
/// # Errors
///
/// Fails for negative values, non-numeric strings, and values that do not
/// fit the target integer type.
pub fn count<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + Default,
{
    let raw = match Option::<Scalar>::deserialize(deserializer)? {
        None => return Ok(T::default()),
        Some(Scalar::Unsigned(n)) => n,
        Some(Scalar::Signed(n)) => {
            return Err(D::Error::custom(format!("count cannot be negative: {n}")));
        }
        Some(Scalar::Text(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(T::default());
            }
            trimmed
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("invalid count: {s:?}")))?
        }
    };

    T::try_from(raw).map_err(|_| D::Error::custom(format!("count out of range: {raw}")))
}

/// Deserialize text that may be `null` or a bare number; `null` becomes `""`.
///
/// # Errors
///
/// Fails for booleans, floats, arrays, and objects.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .unwrap_or_default())
}

/// Deserialize optional text; `null` and blank strings become `None`.
///
/// # Errors
///
/// Fails for booleans, floats, arrays, and objects.
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .filter(|s| !s.trim().is_empty()))
}

/// Deserialize a list that may be `null`; `null` becomes an empty list.
///
/// # Errors
///
/// Fails if the value is neither `null` nor a list of `T`.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
