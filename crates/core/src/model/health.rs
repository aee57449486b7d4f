use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::activity::ActivityKind;

/// One timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub at: DateTime<Utc>,
    pub value: f64,
}

/// Readings for the three axes of a motion sensor, sampled together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TriAxis {
    pub x: Vec<Sample>,
    pub y: Vec<Sample>,
    pub z: Vec<Sample>,
}

impl TriAxis {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len()).min(self.z.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector magnitude per sample, truncated to the shortest axis.
    #[must_use]
    pub fn magnitudes(&self) -> Vec<Sample> {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((x, y), z)| Sample {
                at: x.at,
                value: (x.value.powi(2) + y.value.powi(2) + z.value.powi(2)).sqrt(),
            })
            .collect()
    }
}

/// Wearable telemetry shown on the progress page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthData {
    pub heart_rate: Vec<Sample>,
    pub accelerometer: TriAxis,
    pub gyroscope: TriAxis,
    pub device_connected: bool,
    pub last_sync: Option<DateTime<Utc>>,
}

impl HealthData {
    #[must_use]
    pub fn heart_rate_summary(&self) -> Option<HeartRateSummary> {
        HeartRateSummary::from_samples(&self.heart_rate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeartRateSummary {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub latest: Sample,
}

impl HeartRateSummary {
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let latest = *samples.iter().max_by_key(|s| s.at)?;
        let (min, max, sum) = samples.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), s| (min.min(s.value), max.max(s.value), sum + s.value),
        );
        #[allow(clippy::cast_precision_loss)]
        let average = sum / samples.len() as f64;
        Some(Self {
            min,
            max,
            average,
            latest,
        })
    }
}

//
// ─── INSIGHTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Improvement {
    pub metric: String,
    pub percentage: u32,
    pub direction: Trend,
}

impl Improvement {
    /// `+15%` or `-18%`.
    #[must_use]
    pub fn signed_label(&self) -> String {
        let sign = match self.direction {
            Trend::Up => '+',
            Trend::Down => '-',
        };
        format!("{sign}{}%", self.percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiFeedback {
    pub summary: String,
    pub improvements: Vec<Improvement>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyMotivation {
    pub quote: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedActivity {
    pub title: String,
    pub description: String,
    pub kind: ActivityKind,
    pub duration_minutes: u32,
}
