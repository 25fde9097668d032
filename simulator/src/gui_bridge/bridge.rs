use crate::gui_bridge::model::{DatasetListing, NearestQuery, NearestSample, PresentationModel};
use anyhow::Result;
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{Json, WithStatus},
    Filter,
};

/// Time search tolerance in seconds.
pub const SEARCH_TOLERANCE_S: f64 = 0.1;

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

type SharedModel = Arc<RwLock<PresentationModel>>;

fn reply(value: serde_json::Value, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(warp::reply::json(&value), status)
}

fn not_found(message: String) -> WithStatus<Json> {
    reply(json!({ "error": message }), StatusCode::NOT_FOUND)
}

fn poisoned() -> WithStatus<Json> {
    reply(
        json!({ "error": "presentation state unavailable" }),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

fn list_datasets(state: &SharedModel) -> WithStatus<Json> {
    let Ok(model) = state.read() else {
        return poisoned();
    };
    let listing = DatasetListing {
        radar_relative: model.radar_relative,
        max_time: model.max_time(),
        datasets: model.summaries(),
    };
    reply(json!(listing), StatusCode::OK)
}

fn dataset_snapshot(index: usize, state: &SharedModel) -> WithStatus<Json> {
    let Ok(model) = state.read() else {
        return poisoned();
    };
    match model.datasets.get(index) {
        Some(dataset) => reply(json!(dataset.snapshot()), StatusCode::OK),
        None => not_found(format!("no dataset {}", index)),
    }
}

fn nearest_sample(index: usize, query: &NearestQuery, state: &SharedModel) -> WithStatus<Json> {
    let Ok(model) = state.read() else {
        return poisoned();
    };
    let Some(dataset) = model.datasets.get(index) else {
        return not_found(format!("no dataset {}", index));
    };
    let Some(row) = dataset.find_time_within(query.time, SEARCH_TOLERANCE_S) else {
        return not_found(format!(
            "no sample of '{}' within {} s of {}",
            dataset.name(),
            SEARCH_TOLERANCE_S,
            query.time
        ));
    };
    match dataset.row(row) {
        Ok(values) => reply(
            json!(NearestSample {
                dataset: dataset.name().to_string(),
                index: row,
                values,
            }),
            StatusCode::OK,
        ),
        Err(err) => not_found(err.to_string()),
    }
}

/// Read-only HTTP routes over the published datasets.
pub fn routes(
    state: SharedModel,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let list_route = warp::path!("datasets")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| list_datasets(&state));

    let dataset_route = warp::path!("datasets" / usize)
        .and(warp::get())
        .and(state_filter.clone())
        .map(|index: usize, state: SharedModel| dataset_snapshot(index, &state));

    let nearest_route = warp::path!("datasets" / usize / "nearest")
        .and(warp::get())
        .and(warp::query::<NearestQuery>())
        .and(state_filter)
        .map(|index: usize, query: NearestQuery, state: SharedModel| {
            nearest_sample(index, &query, &state)
        });

    list_route.or(dataset_route).or(nearest_route)
}

/// Bridge that holds the published datasets and serves them over HTTP.
pub struct GuiBridge {
    state: SharedModel,
}

impl GuiBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(PresentationModel::default())),
        }
    }

    /// Starts the HTTP endpoint on a dedicated thread.
    pub fn serve(&self, address: SocketAddr) -> thread::JoinHandle<()> {
        let routes = routes(self.state.clone());
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        })
    }

    pub fn publish(&self, model: PresentationModel) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow::anyhow!("presentation state poisoned"))?;
        *guard = model;
        info!(
            "[GUI] published {} datasets spanning {:.2} s",
            guard.datasets.len(),
            guard.max_time()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn shared(&self) -> SharedModel {
        self.state.clone()
    }
}

impl Default for GuiBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenariocore::interface::{CartesianPoint, Frame};
    use scenariocore::series::{Column, SeriesBuilder};

    fn bridge_with_data() -> GuiBridge {
        let mut builder = SeriesBuilder::new("Track Radar", Frame::Geocentric)
            .columns(&Column::RANGE_BEARING_ELEVATION);
        for k in 0..5 {
            builder
                .push(k as f64 * 0.5, &[100.0 + k as f64, 45.0, 10.0], None)
                .unwrap();
        }
        let gui = GuiBridge::new();
        gui.publish(PresentationModel::new(
            vec![builder.build()],
            CartesianPoint::new(1.0, 2.0, 3.0),
        ))
        .unwrap();
        gui
    }

    #[tokio::test]
    async fn listing_reports_published_datasets() {
        let gui = bridge_with_data();
        let response = warp::test::request()
            .method("GET")
            .path("/datasets")
            .reply(&routes(gui.shared()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["datasets"][0]["name"], "Track Radar");
        assert_eq!(body["datasets"][0]["len"], 5);
        assert_eq!(body["max_time"], 2.0);
    }

    #[tokio::test]
    async fn nearest_returns_row_values() {
        let gui = bridge_with_data();
        let response = warp::test::request()
            .method("GET")
            .path("/datasets/0/nearest?time=1.04")
            .reply(&routes(gui.shared()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["index"], 2);
        assert_eq!(body["values"][1][1], 102.0);
    }

    #[tokio::test]
    async fn nearest_outside_tolerance_is_not_found() {
        let gui = bridge_with_data();
        let response = warp::test::request()
            .method("GET")
            .path("/datasets/0/nearest?time=9.0")
            .reply(&routes(gui.shared()))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let missing = warp::test::request()
            .method("GET")
            .path("/datasets/4")
            .reply(&routes(gui.shared()))
            .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
