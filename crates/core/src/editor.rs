//! In-memory authoring session over a single layout: selection, scene focus,
//! structural edits, drag/resize gestures, and snapshot-based undo/redo.
//!
//! A session owns a working copy of the layout. Every committed mutation
//! records the pre-mutation snapshot on the undo stack; pointer gestures
//! bracket their snapshot with [`EditorSession::begin_mutation`] /
//! [`EditorSession::finalize_mutation`] so a whole drag collapses into one
//! undo step. Nothing here touches persistence; saving the edited layout is
//! the caller's job.

use serde::Deserialize;

use crate::element::{Binding, Element, ElementKind, ElementType, Frame};
use crate::error::CoreError;
use crate::geometry::{move_frame, resize_frame, ResizeHandle};
use crate::layout::{Layout, Scene, Transitions, MIN_SCENE_SECS};
use crate::normalize::normalize_layout;
use crate::types::Id;

/// Undo steps retained per session. Older steps fall off the bottom.
pub const UNDO_DEPTH: usize = 30;

// ---------------------------------------------------------------------------
// Scene edits
// ---------------------------------------------------------------------------

/// Partial update for a scene. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneEdit {
    pub name: Option<String>,
    pub duration_secs: Option<u32>,
    pub transitions: Option<Transitions>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Authoring state for one open layout.
#[derive(Debug, Clone)]
pub struct EditorSession {
    layout: Layout,
    selected: Option<Id>,
    active_scene: Option<Id>,
    undo: Vec<Layout>,
    redo: Vec<Layout>,
    pending: Option<Layout>,
}

impl EditorSession {
    /// Open a layout for editing. The layout is normalized first, so legacy
    /// shapes (no timeline, dangling scene members) are repaired before any
    /// edit can observe them.
    pub fn open(mut layout: Layout) -> Self {
        normalize_layout(&mut layout);
        let active_scene = layout.timeline.first().map(|s| s.id);
        Self {
            layout,
            selected: None,
            active_scene,
            undo: Vec::new(),
            redo: Vec::new(),
            pending: None,
        }
    }

    // ---------- Accessors ----------

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Take the edited layout out of the session, consuming it.
    pub fn into_layout(self) -> Layout {
        self.layout
    }

    pub fn selected_id(&self) -> Option<Id> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.layout.element(id))
    }

    pub fn active_scene_id(&self) -> Option<Id> {
        self.active_scene
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.active_scene.and_then(|id| self.layout.scene(id))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    // ---------- Selection & scene focus (not undoable) ----------

    /// Select an element, or clear with `None`.
    pub fn select(&mut self, id: Option<Id>) -> Result<(), CoreError> {
        if let Some(id) = id {
            if self.layout.element(id).is_none() {
                return Err(CoreError::not_found("element", id));
            }
        }
        self.selected = id;
        Ok(())
    }

    /// Focus a scene for subsequent adds and toggles.
    pub fn set_active_scene(&mut self, id: Id) -> Result<(), CoreError> {
        if self.layout.scene(id).is_none() {
            return Err(CoreError::not_found("scene", id));
        }
        self.active_scene = Some(id);
        Ok(())
    }

    // ---------- Element edits ----------

    /// Add a new element of the given type on top of the stack and select it.
    ///
    /// If the active scene lists elements explicitly, the new element joins
    /// that list. A scene showing everything stays that way (it already
    /// includes the newcomer).
    pub fn add_element(&mut self, ty: ElementType) -> Id {
        let snapshot = self.layout.clone();

        let mut element = Element::with_defaults(ty);
        element.layer = self
            .layout
            .elements
            .iter()
            .map(|e| e.layer)
            .max()
            .unwrap_or(0)
            + 1;
        let id = element.id;
        self.layout.elements.push(element);

        if let Some(scene_id) = self.active_scene {
            if let Some(scene) = self.layout.scene_mut(scene_id) {
                if !scene.shows_all() {
                    scene.element_ids.push(id);
                }
            }
        }

        self.push_history(snapshot);
        self.selected = Some(id);
        id
    }

    /// Remove an element and scrub it from every scene.
    pub fn remove_element(&mut self, id: Id) -> Result<(), CoreError> {
        self.mutate(|layout| {
            let before = layout.elements.len();
            layout.elements.retain(|e| e.id != id);
            if layout.elements.len() == before {
                return Err(CoreError::not_found("element", id));
            }
            for scene in &mut layout.timeline {
                scene.element_ids.retain(|eid| *eid != id);
            }
            Ok(())
        })?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    /// Shift an element's draw order. Returns the new layer.
    pub fn bump_layer(&mut self, id: Id, delta: i32) -> Result<i32, CoreError> {
        self.mutate(|layout| {
            let element = layout
                .element_mut(id)
                .ok_or(CoreError::not_found("element", id))?;
            element.layer = element.layer.saturating_add(delta);
            Ok(element.layer)
        })
    }

    pub fn set_label(&mut self, id: Id, label: &str) -> Result<(), CoreError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::Validation(
                "Element label must not be empty".to_string(),
            ));
        }
        self.mutate(|layout| {
            let element = layout
                .element_mut(id)
                .ok_or(CoreError::not_found("element", id))?;
            element.label = label.to_string();
            Ok(())
        })
    }

    /// Attach, replace, or clear (with `None`) an element's data binding.
    pub fn set_binding(&mut self, id: Id, binding: Option<Binding>) -> Result<(), CoreError> {
        if let Some(b) = &binding {
            if b.path.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Binding path must not be empty".to_string(),
                ));
            }
        }
        self.mutate(|layout| {
            let element = layout
                .element_mut(id)
                .ok_or(CoreError::not_found("element", id))?;
            element.binding = binding;
            Ok(())
        })
    }

    /// Replace an element's typed payload wholesale.
    pub fn set_kind(&mut self, id: Id, kind: ElementKind) -> Result<(), CoreError> {
        self.mutate(|layout| {
            let element = layout
                .element_mut(id)
                .ok_or(CoreError::not_found("element", id))?;
            element.kind = kind;
            Ok(())
        })
    }

    /// Set an element's frame directly (numeric entry). Clamped like any
    /// other frame write.
    pub fn set_frame(&mut self, id: Id, frame: Frame) -> Result<(), CoreError> {
        self.mutate(|layout| {
            let element = layout
                .element_mut(id)
                .ok_or(CoreError::not_found("element", id))?;
            element.frame = frame.clamped();
            Ok(())
        })
    }

    // ---------- Pointer gestures ----------

    /// Snapshot the layout at pointer-down. Gesture steps are resolved
    /// against this snapshot, so re-applying the same cumulative delta is
    /// idempotent. Calling it again restarts the gesture.
    pub fn begin_mutation(&mut self) {
        self.pending = Some(self.layout.clone());
    }

    /// Drag an element by a cumulative fractional delta from the gesture
    /// start. Position clamps so the frame stays inside the canvas.
    pub fn move_element(&mut self, id: Id, dx: f64, dy: f64) -> Result<(), CoreError> {
        let start = self.gesture_frame(id)?;
        let next = move_frame(start, (dx, dy));
        if let Some(element) = self.layout.element_mut(id) {
            element.frame = next;
        }
        Ok(())
    }

    /// Resize an element via a corner handle by a cumulative fractional
    /// delta from the gesture start.
    pub fn resize_element(
        &mut self,
        id: Id,
        handle: ResizeHandle,
        dx: f64,
        dy: f64,
        min: (f64, f64),
        aspect_lock: bool,
    ) -> Result<(), CoreError> {
        let start = self.gesture_frame(id)?;
        let next = resize_frame(start, handle, (dx, dy), min, aspect_lock);
        if let Some(element) = self.layout.element_mut(id) {
            element.frame = next;
        }
        Ok(())
    }

    /// Commit the gesture at pointer-up: the pointer-down snapshot becomes
    /// one undo step. A stray pointer-up with no gesture open is ignored.
    pub fn finalize_mutation(&mut self) {
        if let Some(snapshot) = self.pending.take() {
            self.push_history(snapshot);
        }
    }

    fn gesture_frame(&self, id: Id) -> Result<Frame, CoreError> {
        let pending = self.pending.as_ref().ok_or_else(|| {
            CoreError::Validation("No mutation in progress".to_string())
        })?;
        pending
            .element(id)
            .map(|e| e.frame)
            .ok_or(CoreError::not_found("element", id))
    }

    // ---------- Scene edits ----------

    /// Append a scene to the timeline and focus it.
    pub fn add_scene(&mut self, name: &str) -> Result<Id, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "Scene name must not be empty".to_string(),
            ));
        }
        let id = self.mutate(|layout| {
            let scene = Scene::new(name);
            let id = scene.id;
            layout.timeline.push(scene);
            Ok(id)
        })?;
        self.active_scene = Some(id);
        Ok(id)
    }

    /// Delete a scene. The last remaining scene cannot be deleted; a layout
    /// always plays something.
    pub fn delete_scene(&mut self, id: Id) -> Result<(), CoreError> {
        if self.layout.scene(id).is_none() {
            return Err(CoreError::not_found("scene", id));
        }
        if self.layout.timeline.len() == 1 {
            return Err(CoreError::Validation(
                "Cannot delete the only scene".to_string(),
            ));
        }
        self.mutate(|layout| {
            layout.timeline.retain(|s| s.id != id);
            Ok(())
        })?;
        if self.active_scene == Some(id) {
            self.active_scene = self.layout.timeline.first().map(|s| s.id);
        }
        Ok(())
    }

    /// Apply a partial scene update. Durations are floored to the scene
    /// minimum.
    pub fn edit_scene(&mut self, id: Id, edit: SceneEdit) -> Result<(), CoreError> {
        if let Some(name) = &edit.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Scene name must not be empty".to_string(),
                ));
            }
        }
        self.mutate(|layout| {
            let scene = layout
                .scene_mut(id)
                .ok_or(CoreError::not_found("scene", id))?;
            if let Some(name) = edit.name {
                scene.name = name.trim().to_string();
            }
            if let Some(secs) = edit.duration_secs {
                scene.duration_secs = secs.max(MIN_SCENE_SECS);
            }
            if let Some(transitions) = edit.transitions {
                scene.transitions = transitions;
            }
            Ok(())
        })
    }

    /// Flip an element's membership in a scene. Returns whether the element
    /// is visible in the scene afterwards.
    ///
    /// Toggling inside a show-everything scene first materializes the full
    /// element list, then removes the toggled element. Removing the final
    /// listed element leaves the list empty, which reads as "show
    /// everything" again.
    pub fn toggle_scene_element(&mut self, scene_id: Id, element_id: Id) -> Result<bool, CoreError> {
        if self.layout.element(element_id).is_none() {
            return Err(CoreError::not_found("element", element_id));
        }
        let all_ids: Vec<Id> = self.layout.elements.iter().map(|e| e.id).collect();
        self.mutate(|layout| {
            let scene = layout
                .scene_mut(scene_id)
                .ok_or(CoreError::not_found("scene", scene_id))?;
            if scene.shows_all() {
                scene.element_ids = all_ids;
            }
            if scene.element_ids.contains(&element_id) {
                scene.element_ids.retain(|id| *id != element_id);
            } else {
                scene.element_ids.push(element_id);
            }
            Ok(scene.shows_all() || scene.element_ids.contains(&element_id))
        })
    }

    // ---------- Undo / redo ----------

    /// Step back one mutation. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.layout, previous);
        self.redo.push(current);
        self.repair_cursors();
        true
    }

    /// Step forward again. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.layout, next);
        self.undo.push(current);
        self.repair_cursors();
        true
    }

    // ---------- Internals ----------

    /// Run a mutation against a working copy; commit and record one undo
    /// step only on success, so a failed edit leaves the session untouched.
    fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut Layout) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut next = self.layout.clone();
        let out = f(&mut next)?;
        let previous = std::mem::replace(&mut self.layout, next);
        self.push_history(previous);
        Ok(out)
    }

    fn push_history(&mut self, snapshot: Layout) {
        self.undo.push(snapshot);
        if self.undo.len() > UNDO_DEPTH {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Selection and scene focus can dangle after undo/redo; point them back
    /// at something that exists.
    fn repair_cursors(&mut self) {
        if let Some(id) = self.selected {
            if self.layout.element(id).is_none() {
                self.selected = None;
            }
        }
        let scene_ok = self
            .active_scene
            .map(|id| self.layout.scene(id).is_some())
            .unwrap_or(false);
        if !scene_ok {
            self.active_scene = self.layout.timeline.first().map(|s| s.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
