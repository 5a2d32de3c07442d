use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::workout::{Kind, Metric, Workout};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub elevation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormInput {
    #[serde(rename = "type")]
    pub kind: Kind,
    pub distance: f64,
    pub duration: f64,
    pub cadence: f64,
    pub elevation: f64,
}

impl FormInput {
    pub fn from_fields(fields: &FormFields) -> Result<Self, ValidationError> {
        let kind = Kind::from_str(&fields.kind)
            .ok_or_else(|| ValidationError::UnknownKind(fields.kind.clone()))?;

        Ok(Self {
            kind,
            distance: numeric(&fields.distance),
            duration: numeric(&fields.duration),
            cadence: numeric(&fields.cadence),
            elevation: numeric(&fields.elevation),
        })
    }

    pub fn validate(&self) -> Result<Metric, ValidationError> {
        match self.kind {
            Kind::Running => {
                let inputs = [self.distance, self.duration, self.cadence];
                if !all_finite(&inputs) || !all_positive(&inputs) {
                    return Err(ValidationError::NotPositive);
                }
                Ok(Metric::Cadence(self.cadence))
            }
            Kind::Cycling => {
                if !all_finite(&[self.distance, self.duration, self.elevation])
                    || !all_positive(&[self.distance, self.duration])
                {
                    return Err(ValidationError::NotPositive);
                }
                Ok(Metric::ElevationGain(self.elevation))
            }
        }
    }
}

impl From<&Workout> for FormInput {
    fn from(workout: &Workout) -> Self {
        let (cadence, elevation) = match workout.metric() {
            Metric::Cadence(cadence) => (cadence, 0.0),
            Metric::ElevationGain(elevation) => (0.0, elevation),
        };

        Self {
            kind: workout.kind(),
            distance: workout.distance(),
            duration: workout.duration(),
            cadence,
            elevation,
        }
    }
}

/// Coerces a form value the way a browser's unary `+` does: blank is zero,
/// garbage is NaN.
pub fn numeric(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    match raw.parse::<f64>() {
        Ok(value) => value,
        Err(_) => f64::NAN,
    }
}

fn all_finite(inputs: &[f64]) -> bool {
    inputs.iter().all(|v| v.is_finite())
}

fn all_positive(inputs: &[f64]) -> bool {
    inputs.iter().all(|v| *v > 0.0)
}
