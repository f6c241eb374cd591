use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::config::ScenarioConfig;
use crate::workflow::runner::Runner;
use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

fn run_scenario(runner: &Runner, config: &ScenarioConfig) -> Result<VisualizationModel> {
    let result = runner.execute_with(config, Utc::now())?;
    Ok(VisualizationModel::from_result(
        config.name.as_deref().unwrap_or("scenario"),
        config.viewport.width,
        config.viewport.height,
        &result,
    ))
}

/// Bridge that hosts the HTTP endpoint the viewer polls and accepts new
/// scenarios to run.
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            runner,
        }
    }

    /// Starts serving `GET /payload` and `POST /ingest-config` on a
    /// background thread.
    pub fn serve(&self) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner = self.runner.clone();
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("payload")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<VisualizationModel>>| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&*guard)
            });

        let scenario_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: ScenarioConfig,
                 state: Arc<RwLock<VisualizationModel>>,
                 runner: Arc<Runner>| async move {
                    match run_scenario(&runner, &config) {
                        Ok(model) => {
                            let reply = json!({
                                "status": "ok",
                                "azimuth": model.azimuth,
                                "visible": model.visible,
                            });
                            info!(
                                "[GUI] Scenario {} -> {} visible",
                                model.scenario,
                                model.visible.len()
                            );
                            *state.write().unwrap_or_else(PoisonError::into_inner) = model;
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&reply),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            error!("ingest-config error: {:#}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(scenario_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {err}");
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = model.clone();
        println!(
            "[GUI] azimuth {:.1}, draw commands: {}, visible: {:?}",
            guard.azimuth,
            guard.commands.len(),
            guard.visible
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
