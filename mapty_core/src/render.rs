//! Markup for list entries and marker popups.

use crate::config::PopupConfig;
use crate::{Popup, Workout, WorkoutDetails};

/// Popup content and options for a workout's marker
pub fn popup(workout: &Workout, config: &PopupConfig) -> Popup {
    let kind = workout.kind();
    Popup {
        content: format!("{} {}", kind.icon(), workout.describe()),
        class_name: format!("{}-popup", kind.as_str()),
        max_width: config.max_width,
        min_width: config.min_width,
        auto_close: config.auto_close,
        close_on_click: config.close_on_click,
    }
}

/// `<li>` fragment for the workout list, tagged with the workout id
pub fn list_entry(workout: &Workout) -> String {
    let kind = workout.kind();
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{title}</h2>
  <button>X</button>
{distance}{duration}"#,
        kind = kind.as_str(),
        id = workout.id(),
        title = workout.describe(),
        distance = detail(kind.icon(), &workout.distance_km().to_string(), "km"),
        duration = detail("⏱", &workout.duration_min().to_string(), "min"),
    );

    match workout.details() {
        WorkoutDetails::Running { cadence_spm, pace_min_per_km } => {
            html.push_str(&detail("⚡️", &format!("{:.1}", pace_min_per_km), "min/km"));
            html.push_str(&detail("🦶🏼", &cadence_spm.to_string(), "spm"));
        }
        WorkoutDetails::Cycling { elevation_gain_m, speed_km_per_h } => {
            html.push_str(&detail("⚡️", &format!("{:.1}", speed_km_per_h), "km/h"));
            html.push_str(&detail("⛰", &elevation_gain_m.to_string(), "m"));
        }
    }

    html.push_str("</li>\n");
    html
}

fn detail(icon: &str, value: &str, unit: &str) -> String {
    format!(
        r#"  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>
"#
    )
}
