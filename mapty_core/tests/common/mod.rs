//! Recording collaborators for controller integration tests.

#![allow(dead_code)]

use mapty_core::{
    Config, Controller, Coordinates, Error, MapAdapter, MapHandle, MarkerHandle, Popup,
    PositionError, PositionSource, Result, TileLayer, WorkoutId, WorkoutKind, WorkoutView,
};

/// Map that records every call and can be told to fail marker removal
#[derive(Debug, Default)]
pub struct RecordingMap {
    pub initialized: Vec<(Coordinates, u8, TileLayer)>,
    pub next_marker: u64,
    /// Markers currently on the map, with their position and popup
    pub live: Vec<(u64, Coordinates, Popup)>,
    pub remove_calls: Vec<u64>,
    pub views: Vec<(Coordinates, u8)>,
    pub fail_removal: bool,
}

impl RecordingMap {
    pub fn live_ids(&self) -> Vec<u64> {
        self.live.iter().map(|(id, _, _)| *id).collect()
    }
}

impl MapAdapter for RecordingMap {
    fn initialize(
        &mut self,
        center: Coordinates,
        zoom: u8,
        tiles: &TileLayer,
    ) -> Result<MapHandle> {
        self.initialized.push((center, zoom, tiles.clone()));
        Ok(MapHandle::new(self.initialized.len() as u64))
    }

    fn render_marker(&mut self, at: Coordinates, popup: &Popup) -> Result<MarkerHandle> {
        self.next_marker += 1;
        self.live.push((self.next_marker, at, popup.clone()));
        Ok(MarkerHandle::new(self.next_marker))
    }

    fn remove_marker(&mut self, marker: &MarkerHandle) -> Result<()> {
        self.remove_calls.push(marker.raw());
        if self.fail_removal {
            return Err(Error::Map(format!("layer {} is busy", marker.raw())));
        }
        self.live.retain(|(id, _, _)| *id != marker.raw());
        Ok(())
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) -> Result<()> {
        self.views.push((center, zoom));
        Ok(())
    }
}

/// Form and list widgets as plain state
#[derive(Debug, Default)]
pub struct RecordingView {
    pub form_visible: bool,
    pub readout: Option<Coordinates>,
    pub hide_calls: usize,
    pub kind_fields: Option<WorkoutKind>,
    pub alerts: Vec<String>,
    pub entries: Vec<(WorkoutId, String)>,
}

impl RecordingView {
    pub fn entry_ids(&self) -> Vec<WorkoutId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }
}

impl WorkoutView for RecordingView {
    fn show_form(&mut self, at: Coordinates) {
        self.form_visible = true;
        self.readout = Some(at);
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
        self.readout = None;
        self.hide_calls += 1;
    }

    fn show_kind_fields(&mut self, kind: WorkoutKind) {
        self.kind_fields = Some(kind);
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn insert_entry(&mut self, id: WorkoutId, html: &str) {
        self.entries.push((id, html.to_string()));
    }

    fn remove_entry(&mut self, id: WorkoutId) {
        self.entries.retain(|(entry, _)| *entry != id);
    }

    fn clear_entries(&mut self) {
        self.entries.clear();
    }
}

/// Position source that either accepts the request or fails immediately
pub struct ScriptedPosition {
    pub requests: usize,
    pub fail_with: Option<PositionError>,
}

impl PositionSource for ScriptedPosition {
    fn request_current_position(&mut self) -> std::result::Result<(), PositionError> {
        self.requests += 1;
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

pub type TestController = Controller<RecordingMap, RecordingView>;

pub fn controller() -> TestController {
    Controller::new(RecordingMap::default(), RecordingView::default(), Config::default())
}

/// Controller with its map loaded around Madrid
pub fn ready_controller() -> TestController {
    let mut controller = controller();
    controller
        .on_position_acquired(Coordinates::new(40.4, -3.7))
        .expect("map should initialize");
    controller
}
