use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Lowercase words joined by single dashes: `running-shoes`, `tv-4k`.
pub static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug regex"));

/// Up to 15 digits with an optional leading `+`.
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,14}$").expect("phone regex"));

pub static SKU_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("sku regex"));

/// Lets PATCH bodies tell "field absent" (`None`) from "field is null"
/// (`Some(None)`).
pub fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}
