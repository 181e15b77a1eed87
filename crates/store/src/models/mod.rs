//! Request DTOs and store-side records.
//!
//! Entity structs live in `ringside-core`; each submodule here carries the
//! `Deserialize` input DTOs for one entity (create + all-`Option` patch)
//! and any record type the store owns outright, such as layout revisions.

pub mod display;
pub mod layout;
pub mod playlist;

/// Field deserializer for clearable patch fields.
///
/// Plain `Option<Option<T>>` folds a JSON `null` into the outer `None`,
/// which reads as "field absent, leave it alone". Wrapping the parsed value
/// in `Some` keeps the distinction: absent stays `None` via
/// `#[serde(default)]`, an explicit `null` becomes `Some(None)` and clears
/// the target.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}
