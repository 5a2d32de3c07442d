use crate::types::workout::{Details, Workout};

pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), escape(workout.description()))
}

pub fn list_item(workout: &Workout) -> String {
    let kind = workout.kind();
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <span class="workout__edit">Edit</span>
  <span class="workout__delete">Delete</span>
  <h2 class="workout__title">{title}</h2>
{distance}
{duration}
"#,
        kind = kind.as_str(),
        id = escape(workout.id().as_str()),
        title = escape(workout.description()),
        distance = detail(kind.icon(), &workout.distance().to_string(), "km"),
        duration = detail("⏱", &workout.duration().to_string(), "min"),
    );

    let extra = match workout.details() {
        Details::Running { cadence, pace } => [
            detail("⚡️", &format!("{:.1}", pace), "min/km"),
            detail("🦶🏼", &cadence.to_string(), "spm"),
        ],
        Details::Cycling {
            elevation_gain,
            speed,
        } => [
            detail("⚡️", &format!("{:.1}", speed), "km/h"),
            detail("⛰", &elevation_gain.to_string(), "m"),
        ],
    };
    for line in extra {
        html.push_str(&line);
        html.push('\n');
    }

    html.push_str("</li>");
    html
}

fn detail(icon: &str, value: &str, unit: &str) -> String {
    format!(
        r#"  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>"#
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
