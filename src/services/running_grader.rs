use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RunningConfig;
use crate::services::scoring::{format_pace, running_score};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// Distance and time reported by an external tracker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningData {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Coordinate>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub state: RunState,
    /// Only present once the run is complete
    pub form_score: Option<f64>,
}

/// Grades a run from distance and duration; no pose input
#[derive(Debug, Clone)]
pub struct RunningGrader {
    config: RunningConfig,
    distance_meters: f64,
    duration_seconds: f64,
    coordinates: Vec<Coordinate>,
    pace: String,
    score: f64,
    complete: bool,
}

impl RunningGrader {
    pub fn new(config: RunningConfig) -> Self {
        Self {
            config,
            distance_meters: 0.0,
            duration_seconds: 0.0,
            coordinates: Vec::new(),
            pace: format_pace(0.0, 0.0),
            score: 0.0,
            complete: false,
        }
    }

    fn result(&self) -> GradingResult {
        GradingResult {
            state: if self.complete {
                RunState::Complete
            } else {
                RunState::InProgress
            },
            form_score: self.complete.then_some(self.score),
        }
    }

    /// Record the latest tracker reading
    pub fn update(&mut self, data: RunningData) -> GradingResult {
        self.distance_meters = data.distance_meters;
        self.duration_seconds = data.duration_seconds;
        if let Some(coordinates) = data.coordinates {
            self.coordinates = coordinates;
        }

        self.pace = format_pace(self.distance_meters, self.duration_seconds);
        if self.complete {
            self.score = running_score(self.distance_meters, self.duration_seconds, &self.config);
        }

        self.result()
    }

    /// Finalize the run and compute its score
    pub fn complete(&mut self) -> GradingResult {
        self.complete = true;
        self.score = running_score(self.distance_meters, self.duration_seconds, &self.config);
        info!(
            distance_meters = self.distance_meters,
            duration_seconds = self.duration_seconds,
            score = self.score,
            "run completed"
        );
        self.result()
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn pace(&self) -> &str {
        &self.pace
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

impl Default for RunningGrader {
    fn default() -> Self {
        Self::new(RunningConfig::default())
    }
}
