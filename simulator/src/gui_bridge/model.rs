use scenariocore::interface::CartesianPoint;
use scenariocore::series::{SearchableSeries, SeriesSummary};
use serde::{Deserialize, Serialize};

/// Datasets published to presentation consumers. Read-only once published.
#[derive(Debug, Clone, Default)]
pub struct PresentationModel {
    pub datasets: Vec<SearchableSeries>,
    /// Radar position relative to the scene origin.
    pub radar_relative: CartesianPoint,
}

impl PresentationModel {
    pub fn new(datasets: Vec<SearchableSeries>, radar_relative: CartesianPoint) -> Self {
        Self {
            datasets,
            radar_relative,
        }
    }

    pub fn summaries(&self) -> Vec<SeriesSummary> {
        self.datasets
            .iter()
            .map(|dataset| dataset.snapshot().summary())
            .collect()
    }

    /// Longest time span across datasets, for playback controls.
    pub fn max_time(&self) -> f64 {
        self.datasets
            .iter()
            .filter_map(|dataset| dataset.time().last().copied())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListing {
    pub radar_relative: CartesianPoint,
    pub max_time: f64,
    pub datasets: Vec<SeriesSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearestQuery {
    pub time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestSample {
    pub dataset: String,
    pub index: usize,
    pub values: Vec<(String, f64)>,
}
