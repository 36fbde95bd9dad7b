// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::{Deserialize, Deserializer, Serializer};
use chrono::{DateTime, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// [`to_rfc3339_ms`] for optional timestamps; `None` becomes `null`.
pub fn to_rfc3339_ms_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => to_rfc3339_ms(dt, s),
        None => s.serialize_none(),
    }
}

/// Distinguish an absent field from an explicit `null` in PATCH bodies.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
pub fn double_option<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}
