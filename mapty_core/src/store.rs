//! Ordered store of active workouts and their map markers.
//!
//! Insertion order is display order. Lookups are linear scans; a session
//! holds tens of workouts, not millions.

use crate::{Error, MarkerHandle, Result, Workout, WorkoutId};

#[derive(Debug)]
struct Entry {
    workout: Workout,
    marker: MarkerHandle,
}

/// The authoritative set of workouts for the current session
#[derive(Debug, Default)]
pub struct WorkoutStore {
    entries: Vec<Entry>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a workout with its marker; an existing id is never overwritten
    pub fn add(&mut self, workout: Workout, marker: MarkerHandle) -> Result<()> {
        let id = workout.id();
        if self.contains(id) {
            return Err(Error::DuplicateId(id));
        }

        self.entries.push(Entry { workout, marker });
        tracing::debug!("Stored workout {} ({} total)", id, self.entries.len());
        Ok(())
    }

    pub fn find_by_id(&self, id: WorkoutId) -> Option<&Workout> {
        self.position(id).map(|idx| &self.entries[idx].workout)
    }

    pub fn contains(&self, id: WorkoutId) -> bool {
        self.position(id).is_some()
    }

    pub fn marker(&self, id: WorkoutId) -> Option<&MarkerHandle> {
        self.position(id).map(|idx| &self.entries[idx].marker)
    }

    /// Remove a workout, returning its marker for the caller to release
    pub fn remove(&mut self, id: WorkoutId) -> Result<MarkerHandle> {
        let idx = self.position(id).ok_or(Error::NotFound(id))?;
        let entry = self.entries.remove(idx);
        tracing::debug!("Removed workout {} ({} left)", id, self.entries.len());
        Ok(entry.marker)
    }

    /// Swap in a freshly rendered marker, returning the previous one
    pub fn replace_marker(&mut self, id: WorkoutId, marker: MarkerHandle) -> Result<MarkerHandle> {
        let idx = self.position(id).ok_or(Error::NotFound(id))?;
        Ok(std::mem::replace(&mut self.entries[idx].marker, marker))
    }

    /// Workouts in insertion order; clone the iterator to walk it again
    pub fn all(&self) -> impl Iterator<Item = &Workout> + Clone + '_ {
        self.entries.iter().map(|entry| &entry.workout)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: WorkoutId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.workout.id() == id)
    }
}
