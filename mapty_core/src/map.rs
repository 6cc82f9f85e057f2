//! Contracts for the collaborators the controller drives.
//!
//! The map surface, the position source and the form/list widgets live
//! outside this crate. The host implements these traits and forwards user
//! input back as [`AppEvent`](crate::AppEvent)s.

use crate::{Coordinates, PositionError, Result, WorkoutId, WorkoutKind};

/// Handle to an initialized map, returned by [`MapAdapter::initialize`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapHandle(u64);

impl MapHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Opaque reference to a rendered marker
///
/// Not `Clone`: the store holds the only copy until the marker is removed.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Tile source used when the map is initialized
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

/// Popup bound to a marker
#[derive(Clone, Debug, PartialEq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

/// Map rendering surface
pub trait MapAdapter {
    fn initialize(&mut self, center: Coordinates, zoom: u8, tiles: &TileLayer)
        -> Result<MapHandle>;

    /// Add a marker with its popup opened
    fn render_marker(&mut self, at: Coordinates, popup: &Popup) -> Result<MarkerHandle>;

    /// Take a marker off the map; on failure the caller keeps the handle
    fn remove_marker(&mut self, marker: &MarkerHandle) -> Result<()>;

    fn set_view(&mut self, center: Coordinates, zoom: u8) -> Result<()>;
}

/// Source of the user's current position
///
/// A request is answered later, at most once, by the host dispatching
/// `AppEvent::PositionAcquired` or `AppEvent::PositionFailed`. It may never be
/// answered at all. An immediate `Err` means no request could be made.
pub trait PositionSource {
    fn request_current_position(&mut self) -> std::result::Result<(), PositionError>;
}

/// Form and workout list widgets
pub trait WorkoutView {
    /// Reveal the form, show the coordinates readout and focus distance
    fn show_form(&mut self, at: Coordinates);

    /// Clear all inputs, hide the form and the coordinates readout
    fn hide_form(&mut self);

    /// Show the kind-specific row for `kind` (cadence or elevation)
    fn show_kind_fields(&mut self, kind: WorkoutKind);

    /// Blocking notification
    fn alert(&mut self, message: &str);

    /// Add a rendered list entry tagged with `id`
    fn insert_entry(&mut self, id: WorkoutId, html: &str);

    fn remove_entry(&mut self, id: WorkoutId);

    fn clear_entries(&mut self);
}
