//! Core domain types for the Mapty workout map.
//!
//! This module defines:
//! - Map coordinates and workout identities
//! - Workout kinds and their kind-specific payloads
//! - The immutable `Workout` record with its derived metric

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Location and Identity
// ============================================================================

/// A latitude/longitude pair in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Renders as the `lat/lng` readout shown next to the form
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.lat, self.lng)
    }
}

/// Opaque workout identity, derived from the creation time in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkoutId(u64);

impl WorkoutId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the `data-id` attribute written into list entries
impl FromStr for WorkoutId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(WorkoutId)
    }
}

// ============================================================================
// Workout Kinds
// ============================================================================

/// Kind of workout, as selected in the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Running,
    Cycling,
}

impl WorkoutKind {
    /// Form selector value and CSS modifier
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "running",
            WorkoutKind::Cycling => "cycling",
        }
    }

    /// Capitalized name used in descriptions
    pub fn label(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "Running",
            WorkoutKind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutKind::Running => "🏃‍♂️",
            WorkoutKind::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "running" => Ok(WorkoutKind::Running),
            "cycling" => Ok(WorkoutKind::Cycling),
            other => Err(format!("unknown workout kind: {:?}", other)),
        }
    }
}

// ============================================================================
// Workout Record
// ============================================================================

/// Kind-specific payload with its derived metric
#[derive(Clone, Debug, PartialEq)]
pub enum WorkoutDetails {
    Running {
        cadence_spm: u32,
        /// min/km
        pace_min_per_km: f64,
    },
    Cycling {
        elevation_gain_m: f64,
        /// km/h
        speed_km_per_h: f64,
    },
}

/// A recorded workout
///
/// Built only by the factory from validated input; all fields are fixed at
/// construction, including the derived metric and the description.
#[derive(Clone, Debug, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    created_at: DateTime<Utc>,
    coords: Coordinates,
    distance_km: f64,
    duration_min: f64,
    description: String,
    details: WorkoutDetails,
}

impl Workout {
    /// Inputs must be finite with positive distance, duration and cadence.
    pub fn running(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        cadence_spm: u32,
    ) -> Self {
        let details = WorkoutDetails::Running {
            cadence_spm,
            pace_min_per_km: duration_min / distance_km,
        };
        Self::with_details(id, created_at, coords, distance_km, duration_min, details)
    }

    /// Inputs must be finite with positive distance and duration, and a
    /// non-negative elevation gain.
    pub fn cycling(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        elevation_gain_m: f64,
    ) -> Self {
        let details = WorkoutDetails::Cycling {
            elevation_gain_m,
            speed_km_per_h: distance_km / (duration_min / 60.0),
        };
        Self::with_details(id, created_at, coords, distance_km, duration_min, details)
    }

    fn with_details(
        id: WorkoutId,
        created_at: DateTime<Utc>,
        coords: Coordinates,
        distance_km: f64,
        duration_min: f64,
        details: WorkoutDetails,
    ) -> Self {
        let kind = match details {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        };
        let local_date = created_at.with_timezone(&Local).date_naive();

        Self {
            id,
            created_at,
            coords,
            distance_km,
            duration_min,
            description: describe_on(kind, local_date),
            details,
        }
    }

    pub fn id(&self) -> WorkoutId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn coords(&self) -> Coordinates {
        self.coords
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn duration_min(&self) -> f64 {
        self.duration_min
    }

    pub fn details(&self) -> &WorkoutDetails {
        &self.details
    }

    pub fn kind(&self) -> WorkoutKind {
        match self.details {
            WorkoutDetails::Running { .. } => WorkoutKind::Running,
            WorkoutDetails::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// "<Kind> on <Month> <Day>", from the local date at construction
    pub fn describe(&self) -> &str {
        &self.description
    }

    /// Pace in min/km (running only)
    pub fn pace(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Running { pace_min_per_km, .. } => Some(pace_min_per_km),
            WorkoutDetails::Cycling { .. } => None,
        }
    }

    /// Speed in km/h (cycling only)
    pub fn speed(&self) -> Option<f64> {
        match self.details {
            WorkoutDetails::Cycling { speed_km_per_h, .. } => Some(speed_km_per_h),
            WorkoutDetails::Running { .. } => None,
        }
    }
}

/// Build a description such as "Cycling on March 7"
pub fn describe_on(kind: WorkoutKind, date: NaiveDate) -> String {
    format!("{} on {}", kind.label(), date.format("%B %-d"))
}
