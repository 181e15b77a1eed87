//! Demo seed: one published scoreboard layout, a registered display, and a
//! playlist, so a fresh server has something for a player to fetch.

use ringside_core::element::{Binding, Element, ElementKind, ElementType, Frame, TextElement, TextStyle};
use ringside_core::error::CoreError;
use ringside_core::layout::Scene;
use ringside_core::types::Id;

use crate::models::display::RegisterDisplayInput;
use crate::models::layout::{CreateLayoutInput, UpdateLayoutInput};
use crate::models::playlist::SavePlaylistInput;
use crate::repositories::{DisplayRepo, LayoutRepo, PlaylistRepo};
use crate::store::Store;

/// What the seed created, for startup logging. The access token is logged
/// once so an operator can point a player at the fresh server.
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub layout_id: Id,
    pub playlist_id: Id,
    pub display_id: Id,
    pub access_token: String,
}

/// Seed the store with a demo scoreboard wired to the given event.
pub async fn seed(store: &Store, event_id: Id) -> Result<DemoSeed, CoreError> {
    let layout = LayoutRepo::create(
        store,
        &CreateLayoutInput {
            name: "Demo scoreboard".to_string(),
            event_id: Some(event_id),
            canvas: None,
            theme: Some("dark".to_string()),
        },
    )
    .await?;

    let mut headline = Element::with_defaults(ElementType::Text);
    headline.label = "Now in the ring".to_string();
    headline.frame = Frame::new(0.05, 0.06, 0.9, 0.14);
    headline.binding = Some(Binding {
        path: "live.current.competitor".to_string(),
        fallback: Some("Waiting for the next run".to_string()),
    });
    if let ElementKind::Text(text) = &mut headline.kind {
        *text = TextElement {
            text: "Now in the ring".to_string(),
            style: TextStyle {
                size: 0.09,
                ..TextStyle::default()
            },
        };
    }

    let mut standings = Element::with_defaults(ElementType::Table);
    standings.label = "Standings".to_string();
    standings.frame = Frame::new(0.05, 0.26, 0.9, 0.55);

    let mut ticker = Element::with_defaults(ElementType::Ticker);
    ticker.label = "Sponsors".to_string();

    let mut clock = Element::with_defaults(ElementType::Clock);
    clock.label = "Clock".to_string();

    let mut live_scene = Scene::new("Live");
    live_scene.element_ids = vec![headline.id, ticker.id, clock.id];
    live_scene.duration_secs = 12;
    let mut results_scene = Scene::new("Results");
    results_scene.element_ids = vec![standings.id, ticker.id, clock.id];
    results_scene.duration_secs = 15;

    let layout = LayoutRepo::update(
        store,
        layout.id,
        UpdateLayoutInput {
            version: layout.version,
            elements: Some(vec![headline, standings, ticker, clock]),
            timeline: Some(vec![live_scene, results_scene]),
            comment: Some("Demo seed".to_string()),
            ..Default::default()
        },
    )
    .await?;
    let layout = LayoutRepo::publish(store, layout.id).await?;

    let playlist = PlaylistRepo::save(
        store,
        SavePlaylistInput {
            id: None,
            title: "Demo rotation".to_string(),
            group: Some("main".to_string()),
            layout_id: Some(layout.id),
            items: Vec::new(),
            rotation_secs: Some(30),
            priority: None,
            starts_at: None,
            ends_at: None,
            enabled: None,
        },
    )
    .await?;

    // Named `registered` rather than `display`: a local called `display`
    // collides with the `use tracing::field::display` inside tracing's
    // value-set macro expansion and fails to compile.
    let registered = DisplayRepo::register(
        store,
        &RegisterDisplayInput {
            name: "Demo display".to_string(),
            group: Some("main".to_string()),
            heartbeat_interval_secs: None,
            assigned_layout_id: None,
            assigned_playlist_id: None,
        },
    )
    .await?;

    tracing::info!(
        layout_id = %layout.id,
        playlist_id = %playlist.id,
        display_id = %registered.id,
        "Seeded demo data"
    );

    Ok(DemoSeed {
        layout_id: layout.id,
        playlist_id: playlist.id,
        display_id: registered.id,
        access_token: registered.access_token,
    })
}
