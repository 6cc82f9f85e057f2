//! App controller: the interaction state machine.
//!
//! The controller reacts to one event at a time on the host's event thread:
//!
//! 1. **AwaitingPosition**: nothing but a position answer is handled. A
//!    failure leaves the controller here for the rest of the session.
//! 2. **MapReady**: map clicks open the form, list clicks re-center or delete.
//! 3. **FormOpen**: submit builds a workout, escape cancels, another map
//!    click only moves the pending coordinates.
//!
//! Deletion runs store, then map, then list. If a later step fails only the
//! visual layer is stale: the marker is parked as an orphan and
//! [`Controller::reconcile`] retries it and rebuilds the list from the store.

use crate::config::Config;
use crate::factory::{RawWorkoutForm, WorkoutFactory};
use crate::map::{MapAdapter, MapHandle, MarkerHandle, PositionSource, WorkoutView};
use crate::render;
use crate::store::WorkoutStore;
use crate::{Coordinates, Error, PositionError, Result, WorkoutId, WorkoutKind};
use chrono::Utc;

/// Top-level controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingPosition,
    MapReady,
    FormOpen,
}

/// Which part of a list entry was clicked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Body,
    DeleteButton,
}

/// A click inside the workout list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListClick {
    /// `data-id` of the enclosing entry, if the click landed on one
    pub entry_id: Option<String>,
    pub target: ClickTarget,
}

impl ListClick {
    pub fn body(id: WorkoutId) -> Self {
        Self {
            entry_id: Some(id.to_string()),
            target: ClickTarget::Body,
        }
    }

    pub fn delete(id: WorkoutId) -> Self {
        Self {
            entry_id: Some(id.to_string()),
            target: ClickTarget::DeleteButton,
        }
    }

    /// A click on the list outside any entry
    pub fn outside() -> Self {
        Self {
            entry_id: None,
            target: ClickTarget::Body,
        }
    }
}

/// Events forwarded by the host
#[derive(Clone, Debug, PartialEq)]
pub enum AppEvent {
    PositionAcquired(Coordinates),
    PositionFailed(PositionError),
    MapClicked(Coordinates),
    FormSubmitted(RawWorkoutForm),
    /// Escape pressed
    FormCancelled,
    /// The kind selector changed to this raw value
    KindChanged(String),
    ListClicked(ListClick),
}

#[derive(Debug)]
struct ControllerState {
    phase: Phase,
    map: Option<MapHandle>,
    pending: Option<Coordinates>,
    selected: Option<WorkoutId>,
    /// Markers whose removal failed, retried on reconcile
    orphans: Vec<MarkerHandle>,
}

/// Owns the session's workouts and drives the map and view collaborators
pub struct Controller<M, V> {
    map: M,
    view: V,
    config: Config,
    factory: WorkoutFactory,
    store: WorkoutStore,
    state: ControllerState,
}

impl<M: MapAdapter, V: WorkoutView> Controller<M, V> {
    pub fn new(map: M, view: V, config: Config) -> Self {
        Self {
            map,
            view,
            config,
            factory: WorkoutFactory::new(),
            store: WorkoutStore::new(),
            state: ControllerState {
                phase: Phase::AwaitingPosition,
                map: None,
                pending: None,
                selected: None,
                orphans: Vec::new(),
            },
        }
    }

    /// Ask for the user's position; the answer arrives as an event
    ///
    /// An immediate failure is not retried: the map stays uninitialized.
    pub fn start<P: PositionSource>(&mut self, source: &mut P) -> Result<()> {
        if let Err(e) = source.request_current_position() {
            tracing::warn!("Position request failed, map will not load: {}", e);
            return Err(e.into());
        }
        tracing::info!("Requested current position");
        Ok(())
    }

    /// Route an event to its handler
    ///
    /// Rejected input and stale list references are handled here (the user
    /// was alerted, or the click is dropped). Anything else is returned.
    pub fn dispatch(&mut self, event: AppEvent) -> Result<()> {
        let result = match event {
            AppEvent::PositionAcquired(at) => self.on_position_acquired(at),
            AppEvent::PositionFailed(e) => {
                self.on_position_failed(&e);
                Ok(())
            }
            AppEvent::MapClicked(at) => {
                self.on_map_click(at);
                Ok(())
            }
            AppEvent::FormSubmitted(raw) => self.submit_form(&raw).map(|_| ()),
            AppEvent::FormCancelled => {
                self.cancel_form();
                Ok(())
            }
            AppEvent::KindChanged(raw) => {
                self.change_kind(&raw);
                Ok(())
            }
            AppEvent::ListClicked(click) => self.on_list_click(&click),
        };

        match result {
            Err(Error::Validation(e)) => {
                tracing::debug!("Rejected workout form: {}", e);
                Ok(())
            }
            Err(Error::NotFound(id)) => {
                tracing::warn!("Ignoring list click for unknown workout {}", id);
                Ok(())
            }
            Err(Error::State(msg)) => {
                tracing::warn!("Ignoring event: {}", msg);
                Ok(())
            }
            other => other,
        }
    }

    /// Initialize the map at `at`; later positions are ignored
    pub fn on_position_acquired(&mut self, at: Coordinates) -> Result<()> {
        if self.state.phase != Phase::AwaitingPosition {
            tracing::debug!("Map already loaded, ignoring position update {}", at);
            return Ok(());
        }

        let tiles = self.config.map.tile_layer();
        let handle = self.map.initialize(at, self.config.map.zoom, &tiles)?;
        self.state.map = Some(handle);
        self.state.phase = Phase::MapReady;
        tracing::info!("Map ready at {} (zoom {})", at, self.config.map.zoom);

        self.view.show_kind_fields(self.config.form.default_kind);
        self.rerender_markers()
    }

    pub fn on_position_failed(&mut self, error: &PositionError) {
        tracing::warn!("Could not get your position, map will not load: {}", error);
    }

    /// Open the form for `at`, or move the pending location if already open
    pub fn on_map_click(&mut self, at: Coordinates) {
        if self.state.phase == Phase::AwaitingPosition {
            tracing::debug!("Map not ready, ignoring click at {}", at);
            return;
        }

        if self.state.phase == Phase::FormOpen {
            tracing::debug!("Form already open, moving pending location to {}", at);
        }
        self.state.pending = Some(at);
        self.state.phase = Phase::FormOpen;
        self.view.show_form(at);
    }

    /// Build a workout from the open form and render it
    ///
    /// On invalid input the user is alerted and nothing changes.
    pub fn submit_form(&mut self, raw: &RawWorkoutForm) -> Result<WorkoutId> {
        let at = match (self.state.phase, self.state.pending) {
            (Phase::FormOpen, Some(at)) => at,
            _ => return Err(Error::State("workout form is not open".into())),
        };

        let workout = match self.factory.build(raw, at, Utc::now()) {
            Ok(workout) => workout,
            Err(e) => {
                self.view.alert(&e.to_string());
                return Err(e.into());
            }
        };

        let id = workout.id();
        if self.store.contains(id) {
            tracing::error!("Workout id {} already stored", id);
            return Err(Error::DuplicateId(id));
        }

        let popup = render::popup(&workout, &self.config.popup);
        let entry = render::list_entry(&workout);
        let marker = self.map.render_marker(at, &popup)?;
        self.store.add(workout, marker)?;
        self.view.insert_entry(id, &entry);

        self.state.pending = None;
        self.state.phase = Phase::MapReady;
        self.view.hide_form();

        tracing::info!("Added workout {} at {}", id, at);
        Ok(id)
    }

    /// Close the form without creating a workout (escape key)
    pub fn cancel_form(&mut self) {
        if self.state.phase != Phase::FormOpen {
            return;
        }
        self.state.pending = None;
        self.state.phase = Phase::MapReady;
        self.view.hide_form();
        tracing::debug!("Workout form cancelled");
    }

    /// Swap the kind-specific form row
    pub fn change_kind(&mut self, raw: &str) {
        match raw.parse::<WorkoutKind>() {
            Ok(kind) => self.view.show_kind_fields(kind),
            Err(e) => tracing::warn!("Ignoring kind selector change: {}", e),
        }
    }

    pub fn on_list_click(&mut self, click: &ListClick) -> Result<()> {
        let Some(raw_id) = click.entry_id.as_deref() else {
            return Ok(());
        };
        let id: WorkoutId = match raw_id.parse() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Ignoring list entry with bad id {:?}: {}", raw_id, e);
                return Ok(());
            }
        };

        match click.target {
            ClickTarget::DeleteButton => self.delete_workout(id),
            ClickTarget::Body => self.select_workout(id),
        }
    }

    /// Center the map on a stored workout
    pub fn select_workout(&mut self, id: WorkoutId) -> Result<()> {
        let at = self
            .store
            .find_by_id(id)
            .map(|w| w.coords())
            .ok_or(Error::NotFound(id))?;

        self.map.set_view(at, self.config.map.zoom)?;
        self.state.selected = Some(id);
        tracing::debug!("Centered map on workout {}", id);
        Ok(())
    }

    /// Remove a workout from the store, the map and the list, in that order
    pub fn delete_workout(&mut self, id: WorkoutId) -> Result<()> {
        let marker = self.store.remove(id)?;
        if self.state.selected == Some(id) {
            self.state.selected = None;
        }

        if let Err(e) = self.map.remove_marker(&marker) {
            tracing::error!("Workout {} removed but its marker was not: {}", id, e);
            self.state.orphans.push(marker);
            return Err(e);
        }
        self.view.remove_entry(id);

        tracing::info!("Deleted workout {}", id);
        Ok(())
    }

    /// Rebuild every marker and list entry from the store
    pub fn reconcile(&mut self) -> Result<()> {
        if self.state.map.is_none() {
            return Err(Error::State("map is not initialized".into()));
        }

        let orphans = std::mem::take(&mut self.state.orphans);
        for marker in orphans {
            self.release_marker(marker);
        }
        self.rerender_markers()?;

        self.view.clear_entries();
        for workout in self.store.all() {
            self.view.insert_entry(workout.id(), &render::list_entry(workout));
        }
        tracing::info!("Reconciled {} workouts", self.store.len());
        Ok(())
    }

    fn rerender_markers(&mut self) -> Result<()> {
        let pending: Vec<_> = self
            .store
            .all()
            .map(|w| (w.id(), w.coords(), render::popup(w, &self.config.popup)))
            .collect();

        for (id, at, popup) in pending {
            let marker = self.map.render_marker(at, &popup)?;
            let old = self.store.replace_marker(id, marker)?;
            self.release_marker(old);
        }
        Ok(())
    }

    fn release_marker(&mut self, marker: MarkerHandle) {
        if let Err(e) = self.map.remove_marker(&marker) {
            tracing::warn!("Marker {} still on the map: {}", marker.raw(), e);
            self.state.orphans.push(marker);
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_map_ready(&self) -> bool {
        self.state.phase != Phase::AwaitingPosition
    }

    pub fn is_form_visible(&self) -> bool {
        self.state.phase == Phase::FormOpen
    }

    pub fn map_handle(&self) -> Option<MapHandle> {
        self.state.map
    }

    pub fn pending_coordinates(&self) -> Option<Coordinates> {
        self.state.pending
    }

    pub fn selected(&self) -> Option<WorkoutId> {
        self.state.selected
    }

    /// Markers that could not be removed yet
    pub fn orphaned_markers(&self) -> usize {
        self.state.orphans.len()
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
