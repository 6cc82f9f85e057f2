//! Error types for the mapty_core library.

use crate::WorkoutId;
use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mapty_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Form input did not describe a valid workout
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No workout with this id is in the store
    #[error("Workout not found: {0}")]
    NotFound(WorkoutId),

    /// A workout with this id is already in the store
    #[error("Duplicate workout id: {0}")]
    DuplicateId(WorkoutId),

    /// The map adapter failed to carry out a request
    #[error("Map error: {0}")]
    Map(String),

    /// The position source could not provide a position
    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    /// Event arrived in a state that cannot handle it
    #[error("State error: {0}")]
    State(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A workout form input field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Kind,
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Kind => "kind",
            FormField::Distance => "distance",
            FormField::Duration => "duration",
            FormField::Cadence => "cadence",
            FormField::Elevation => "elevation",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected form submission, naming every field that failed
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Inputs have to be positive numbers! (invalid: {})", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FormField>,
}

impl ValidationError {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn has_field(&self, field: FormField) -> bool {
        self.fields.contains(&field)
    }
}

fn join_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(FormField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why the position source did not deliver a position
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("permission to read the position was denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("timed out waiting for a position")]
    Timeout,
}
