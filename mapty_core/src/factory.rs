//! Workout factory: raw form input to validated workouts.
//!
//! Form values arrive as strings. Each is trimmed and read as a number, with
//! an empty field reading as zero. A workout is only built when every field
//! passes; otherwise the error names all failing fields at once.

use crate::{Coordinates, FormField, ValidationError, Workout, WorkoutId, WorkoutKind};
use chrono::{DateTime, Utc};

/// Raw values read from the workout form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawWorkoutForm {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl RawWorkoutForm {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: WorkoutKind::Running.as_str().into(),
            distance: distance.into(),
            duration: duration.into(),
            cadence: cadence.into(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: WorkoutKind::Cycling.as_str().into(),
            distance: distance.into(),
            duration: duration.into(),
            cadence: String::new(),
            elevation: elevation.into(),
        }
    }
}

/// Builds workouts and hands out their ids
#[derive(Debug, Default)]
pub struct WorkoutFactory {
    last_id: Option<u64>,
}

impl WorkoutFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `raw` and build a workout at `coords`, created at `now`
    pub fn build(
        &mut self,
        raw: &RawWorkoutForm,
        coords: Coordinates,
        now: DateTime<Utc>,
    ) -> Result<Workout, ValidationError> {
        let kind: WorkoutKind = raw
            .kind
            .parse()
            .map_err(|_| ValidationError::new(vec![FormField::Kind]))?;

        let mut failed = Vec::new();
        let distance = positive(&raw.distance, FormField::Distance, &mut failed);
        let duration = positive(&raw.duration, FormField::Duration, &mut failed);

        match kind {
            WorkoutKind::Running => {
                let cadence = cadence(&raw.cadence, &mut failed);
                match (distance, duration, cadence) {
                    (Some(distance), Some(duration), Some(cadence)) if failed.is_empty() => {
                        let id = self.next_id(now);
                        Ok(Workout::running(id, now, coords, distance, duration, cadence))
                    }
                    _ => Err(ValidationError::new(failed)),
                }
            }
            WorkoutKind::Cycling => {
                let elevation = elevation(&raw.elevation, &mut failed);
                match (distance, duration, elevation) {
                    (Some(distance), Some(duration), Some(elevation)) if failed.is_empty() => {
                        let id = self.next_id(now);
                        Ok(Workout::cycling(id, now, coords, distance, duration, elevation))
                    }
                    _ => Err(ValidationError::new(failed)),
                }
            }
        }
    }

    /// Millisecond timestamp of `now`, bumped past the previous id if needed
    fn next_id(&mut self, now: DateTime<Utc>) -> WorkoutId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let raw = match self.last_id {
            Some(last) if millis <= last => last + 1,
            _ => millis,
        };
        self.last_id = Some(raw);
        WorkoutId::from_raw(raw)
    }
}

/// Read a form number; empty reads as zero, non-finite values are rejected
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn positive(raw: &str, field: FormField, failed: &mut Vec<FormField>) -> Option<f64> {
    let value = parse_number(raw).filter(|n| *n > 0.0);
    if value.is_none() {
        failed.push(field);
    }
    value
}

/// Steps per minute: a positive whole number
fn cadence(raw: &str, failed: &mut Vec<FormField>) -> Option<u32> {
    let value = parse_number(raw)
        .filter(|n| *n > 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32);
    if value.is_none() {
        failed.push(FormField::Cadence);
    }
    value
}

/// Elevation gain: zero or more meters
fn elevation(raw: &str, failed: &mut Vec<FormField>) -> Option<f64> {
    let value = parse_number(raw).filter(|n| *n >= 0.0);
    if value.is_none() {
        failed.push(FormField::Elevation);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap()
    }

    fn here() -> Coordinates {
        Coordinates::new(40.0, -3.7)
    }

    #[test]
    fn test_builds_running_workout() {
        let mut factory = WorkoutFactory::new();
        let run = factory
            .build(&RawWorkoutForm::running("5", "30", "160"), here(), now())
            .unwrap();

        assert_eq!(run.kind(), WorkoutKind::Running);
        assert_eq!(run.distance_km(), 5.0);
        assert_eq!(run.duration_min(), 30.0);
        assert!((run.pace().unwrap() - 6.0).abs() < 1e-9);
        assert_eq!(run.coords(), here());
        assert_eq!(run.created_at(), now());
    }

    #[test]
    fn test_builds_cycling_workout() {
        let mut factory = WorkoutFactory::new();
        let ride = factory
            .build(&RawWorkoutForm::cycling("20", "60", "150"), here(), now())
            .unwrap();

        assert_eq!(ride.kind(), WorkoutKind::Cycling);
        assert!((ride.speed().unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_trims_whitespace() {
        let mut factory = WorkoutFactory::new();
        let run = factory
            .build(&RawWorkoutForm::running(" 10.5 ", "\t52\n", " 172"), here(), now())
            .unwrap();
        assert_eq!(run.distance_km(), 10.5);
    }

    #[test]
    fn test_rejects_bad_distance_and_duration_for_both_kinds() {
        let bad = ["0", "-3", "abc", "", "NaN", "inf", "-infinity"];

        for value in bad {
            let mut factory = WorkoutFactory::new();

            let err = factory
                .build(&RawWorkoutForm::running(value, "30", "160"), here(), now())
                .unwrap_err();
            assert_eq!(err.fields, vec![FormField::Distance], "distance {:?}", value);

            let err = factory
                .build(&RawWorkoutForm::cycling("20", value, "100"), here(), now())
                .unwrap_err();
            assert_eq!(err.fields, vec![FormField::Duration], "duration {:?}", value);
        }
    }

    #[test]
    fn test_rejects_non_positive_or_fractional_cadence() {
        let mut factory = WorkoutFactory::new();
        for value in ["0", "-160", "", "fast", "160.5"] {
            let err = factory
                .build(&RawWorkoutForm::running("5", "30", value), here(), now())
                .unwrap_err();
            assert_eq!(err.fields, vec![FormField::Cadence], "cadence {:?}", value);
        }
    }

    #[test]
    fn test_reports_every_failing_field() {
        let mut factory = WorkoutFactory::new();
        let err = factory
            .build(&RawWorkoutForm::running("-1", "abc", "0"), here(), now())
            .unwrap_err();

        assert_eq!(
            err.fields,
            vec![FormField::Distance, FormField::Duration, FormField::Cadence]
        );
    }

    #[test]
    fn test_elevation_allows_zero_and_empty() {
        let mut factory = WorkoutFactory::new();
        for value in ["0", "", "  "] {
            let ride = factory
                .build(&RawWorkoutForm::cycling("20", "60", value), here(), now())
                .unwrap();
            assert!(matches!(
                ride.details(),
                crate::WorkoutDetails::Cycling { elevation_gain_m, .. } if *elevation_gain_m == 0.0
            ));
        }
    }

    #[test]
    fn test_elevation_rejects_negative_and_non_finite() {
        let mut factory = WorkoutFactory::new();
        for value in ["-10", "abc", "inf"] {
            let err = factory
                .build(&RawWorkoutForm::cycling("20", "60", value), here(), now())
                .unwrap_err();
            assert_eq!(err.fields, vec![FormField::Elevation], "elevation {:?}", value);
        }
    }

    #[test]
    fn test_kind_specific_field_of_other_kind_is_ignored() {
        let mut factory = WorkoutFactory::new();
        let mut raw = RawWorkoutForm::cycling("20", "60", "150");
        raw.cadence = "garbage".into();

        assert!(factory.build(&raw, here(), now()).is_ok());
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let mut factory = WorkoutFactory::new();
        let mut raw = RawWorkoutForm::running("5", "30", "160");
        raw.kind = "swimming".into();

        let err = factory.build(&raw, here(), now()).unwrap_err();
        assert_eq!(err.fields, vec![FormField::Kind]);
    }

    #[test]
    fn test_ids_are_time_derived_and_strictly_increasing() {
        let mut factory = WorkoutFactory::new();
        let raw = RawWorkoutForm::running("5", "30", "160");

        let first = factory.build(&raw, here(), now()).unwrap();
        let second = factory.build(&raw, here(), now()).unwrap();
        let earlier = factory
            .build(&raw, here(), now() - Duration::seconds(10))
            .unwrap();

        assert_eq!(first.id().as_u64(), now().timestamp_millis() as u64);
        assert!(second.id() > first.id());
        assert!(earlier.id() > second.id());
    }

    #[test]
    fn test_failed_build_does_not_consume_an_id() {
        let mut factory = WorkoutFactory::new();
        let _ = factory.build(&RawWorkoutForm::running("x", "30", "160"), here(), now());

        let run = factory
            .build(&RawWorkoutForm::running("5", "30", "160"), here(), now())
            .unwrap();
        assert_eq!(run.id().as_u64(), now().timestamp_millis() as u64);
    }
}
