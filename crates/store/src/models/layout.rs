//! Layout input DTOs and the immutable revision record.

use serde::{Deserialize, Serialize};

use ringside_core::layout::{Canvas, DataSourceDecl, Layout, LayoutOptions, Scene};
use ringside_core::element::Element;
use ringside_core::types::{Id, Timestamp};

/// DTO for creating a new layout. Everything beyond the name is optional;
/// normalization fills in the default canvas and timeline.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLayoutInput {
    pub name: String,
    #[serde(default)]
    pub event_id: Option<Id>,
    #[serde(default)]
    pub canvas: Option<Canvas>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// DTO for saving a layout. `version` is the version the client loaded;
/// a mismatch with the stored version rejects the write as a conflict.
///
/// `event_id` is doubly optional so a client can clear the event scope by
/// sending an explicit inner `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLayoutInput {
    pub version: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub canvas: Option<Canvas>,
    #[serde(default)]
    pub elements: Option<Vec<Element>>,
    #[serde(default)]
    pub timeline: Option<Vec<Scene>>,
    #[serde(default)]
    pub data_sources: Option<Vec<DataSourceDecl>>,
    #[serde(default)]
    pub options: Option<LayoutOptions>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub event_id: Option<Option<Id>>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// One saved version of a layout. Recorded on create and on every
/// successful update, never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutRevision {
    pub version: u32,
    pub snapshot: Layout,
    pub actor: Option<String>,
    pub comment: Option<String>,
    pub saved_at: Timestamp,
}
