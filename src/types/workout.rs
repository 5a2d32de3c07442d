use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ID_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(ID_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkoutId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for WorkoutId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Running,
    Cycling,
}

impl Kind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "running" => Some(Kind::Running),
            "cycling" => Some(Kind::Cycling),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Running => "running",
            Kind::Cycling => "cycling",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Kind::Running => "Running",
            Kind::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Kind::Running => "🏃‍♂️",
            Kind::Cycling => "🚴‍♀️",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Cadence(f64),
    /// May be zero or negative.
    ElevationGain(f64),
}

impl Metric {
    pub fn kind(&self) -> Kind {
        match self {
            Metric::Cadence(_) => Kind::Running,
            Metric::ElevationGain(_) => Kind::Cycling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Details {
    Running {
        cadence: f64,
        #[serde(default)]
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        #[serde(default)]
        speed: f64,
    },
}

impl Details {
    fn from_metric(metric: Metric) -> Self {
        match metric {
            Metric::Cadence(cadence) => Details::Running { cadence, pace: 0.0 },
            Metric::ElevationGain(elevation_gain) => Details::Cycling {
                elevation_gain,
                speed: 0.0,
            },
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Details::Running { .. } => Kind::Running,
            Details::Cycling { .. } => Kind::Cycling,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    id: WorkoutId,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(rename = "date")]
    created_at: DateTime<Utc>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    clicks: u32,
    #[serde(flatten)]
    details: Details,
}

impl Workout {
    pub fn new(coords: Coords, distance: f64, duration: f64, metric: Metric) -> Self {
        Self::with_id(WorkoutId::generate(), coords, distance, duration, metric, Utc::now())
    }

    pub fn running(coords: Coords, distance: f64, duration: f64, cadence: f64) -> Self {
        Self::new(coords, distance, duration, Metric::Cadence(cadence))
    }

    pub fn cycling(coords: Coords, distance: f64, duration: f64, elevation_gain: f64) -> Self {
        Self::new(coords, distance, duration, Metric::ElevationGain(elevation_gain))
    }

    pub fn with_id(
        id: WorkoutId,
        coords: Coords,
        distance: f64,
        duration: f64,
        metric: Metric,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut workout = Self {
            id,
            coords,
            distance,
            duration,
            created_at,
            description: String::new(),
            clicks: 0,
            details: Details::from_metric(metric),
        };
        workout.recompute();
        workout
    }

    pub fn update(&mut self, distance: f64, duration: f64, metric: Metric) {
        self.distance = distance;
        self.duration = duration;
        self.details = Details::from_metric(metric);
        self.recompute();
    }

    // Stored derived fields are not trusted.
    pub fn restore(mut self) -> Self {
        self.recompute();
        self
    }

    pub fn is_valid(&self) -> bool {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        positive(self.distance)
            && positive(self.duration)
            && match self.details {
                Details::Running { cadence, .. } => positive(cadence),
                Details::Cycling { elevation_gain, .. } => elevation_gain.is_finite(),
            }
    }

    pub fn click(&mut self) {
        self.clicks += 1;
    }

    fn recompute(&mut self) {
        let (distance, duration) = (self.distance, self.duration);
        match &mut self.details {
            Details::Running { pace, .. } => *pace = duration / distance,
            Details::Cycling { speed, .. } => *speed = distance / (duration / 60.0),
        }
        self.description = describe(self.kind(), &self.created_at);
    }

    pub fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn kind(&self) -> Kind {
        self.details.kind()
    }

    pub fn metric(&self) -> Metric {
        match self.details {
            Details::Running { cadence, .. } => Metric::Cadence(cadence),
            Details::Cycling { elevation_gain, .. } => Metric::ElevationGain(elevation_gain),
        }
    }

    pub fn pace(&self) -> Option<f64> {
        match self.details {
            Details::Running { pace, .. } => Some(pace),
            Details::Cycling { .. } => None,
        }
    }

    pub fn speed(&self) -> Option<f64> {
        match self.details {
            Details::Cycling { speed, .. } => Some(speed),
            Details::Running { .. } => None,
        }
    }
}

/// "Running on April 14"
pub fn describe(kind: Kind, date: &DateTime<Utc>) -> String {
    format!("{} on {}", kind.label(), date.format("%B %-d"))
}
