#![forbid(unsafe_code)]

//! Core domain model and controller for the Mapty workout map.
//!
//! This crate provides:
//! - Domain types (coordinates, workout ids, running/cycling workouts)
//! - Workout factory (raw form input to validated workouts)
//! - Workout store (ordered workouts and their map markers)
//! - Collaborator contracts (map adapter, position source, view)
//! - App controller (the event-driven interaction state machine)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod factory;
pub mod store;
pub mod map;
pub mod render;
pub mod controller;

// Re-export commonly used types
pub use error::{Error, FormField, PositionError, Result, ValidationError};
pub use types::*;
pub use config::Config;
pub use factory::{RawWorkoutForm, WorkoutFactory};
pub use store::WorkoutStore;
pub use map::{MapAdapter, MapHandle, MarkerHandle, Popup, PositionSource, TileLayer, WorkoutView};
pub use controller::{AppEvent, ClickTarget, Controller, ListClick, Phase};
