use crate::workflow::runner::{RunSummary, WorkflowResult};
use anyhow::Context;
use scenariocore::interface::EpochRecord;
use scenariocore::series::SeriesSnapshot;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct ScenarioReport<'a> {
    pub summary: &'a RunSummary,
    pub datasets: Vec<SeriesSnapshot>,
    pub epochs: &'a [EpochRecord],
}

impl<'a> ScenarioReport<'a> {
    pub fn from_result(result: &'a WorkflowResult) -> Self {
        Self {
            summary: &result.summary,
            datasets: result.datasets.iter().map(|d| d.snapshot()).collect(),
            epochs: &result.epochs,
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("creating report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    #[test]
    fn report_lists_every_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = WorkflowConfig::from_args(0.1, 1.0, Some(2), false);
        cfg.interchange_path = dir.path().join("scenario.csv");
        let result = Runner::new(cfg).execute().unwrap();

        let path = dir.path().join("out").join("report.json");
        ScenarioReport::from_result(&result).write(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["datasets"].as_array().map(|d| d.len()), Some(5));
        assert_eq!(json["datasets"][0]["name"], "Truth Trajectory");
        assert_eq!(json["summary"]["trajectory_samples"], 11);
        assert_eq!(json["epochs"].as_array().map(|e| e.len()), Some(10));
        assert_eq!(json["epochs"][0]["track_radar"]["status"], "track");
        assert_eq!(json["epochs"][1]["laser"]["status"], "no_track");
        assert!(json["epochs"][1]["laser"]["reading"].is_null());
    }
}
