use crate::bridge::model::ReportModel;
use anyhow::Context;
use log::{error, info};
use serde_json::json;
use spectrocore::interface::{CalibrationRequest, ManualRequest};
use spectrocore::telemetry::MetricsRecorder;
use spectrocore::{CalibrationEngine, CalibrationError};
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedReport = Arc<RwLock<ReportModel>>;
type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

pub fn bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

fn ok<T: serde::Serialize>(body: &T) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), StatusCode::OK)
}

fn rejected(err: &CalibrationError) -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": err.to_string() })),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
}

fn update(state: &SharedReport, apply: impl FnOnce(&mut ReportModel)) {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    apply(&mut guard);
}

fn handle_calibrate(
    request: CalibrationRequest,
    state: SharedReport,
    engine: Arc<CalibrationEngine>,
) -> JsonReply {
    let model = match engine.fit(&request.standards) {
        Ok(model) => model,
        Err(err) => return rejected(&err),
    };
    if request.samples.is_empty() {
        update(&state, |report| {
            report.model = Some(model.clone());
            report.batch = None;
        });
        return ok(&model);
    }
    match engine.run_batch(&model, &request.samples) {
        Ok(batch) => {
            update(&state, |report| {
                report.model = None;
                report.batch = Some(batch.clone());
            });
            ok(&batch)
        }
        Err(err) => rejected(&err),
    }
}

fn handle_manual(
    request: ManualRequest,
    state: SharedReport,
    engine: Arc<CalibrationEngine>,
) -> JsonReply {
    match engine.evaluate_manual(&request.curve, &request.rows) {
        Ok(manual) => {
            update(&state, |report| report.manual = Some(manual.clone()));
            ok(&manual)
        }
        Err(err) => rejected(&err),
    }
}

/// HTTP front end over the calibration engine.
pub struct HttpBridge {
    state: SharedReport,
    engine: Arc<CalibrationEngine>,
    metrics: Arc<MetricsRecorder>,
}

impl HttpBridge {
    pub fn new(engine: Arc<CalibrationEngine>, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ReportModel::default())),
            engine,
            metrics,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());
        let engine = self.engine.clone();
        let engine_filter = warp::any().map(move || engine.clone());
        let metrics = self.metrics.clone();

        let report_route = warp::path("report")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedReport| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                ok(&*guard)
            });

        let status_route = warp::path("status")
            .and(warp::path::end())
            .and(warp::get())
            .map(move || ok(&metrics.snapshot()));

        let calibrate_route = warp::path("calibrate")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(engine_filter.clone())
            .map(handle_calibrate);

        let manual_route = warp::path("manual")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(engine_filter)
            .map(handle_manual);

        report_route
            .or(status_route)
            .or(calibrate_route)
            .or(manual_route)
    }

    /// Serves the routes from a background thread.
    pub fn spawn(&self, address: SocketAddr) -> anyhow::Result<()> {
        let routes = self.routes();
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for HTTP bridge")?;
        let (server_address, server) = runtime
            .block_on(async move { warp::serve(routes).try_bind_ephemeral(address) })
            .with_context(|| format!("binding HTTP bridge to {}", address))?;

        info!("HTTP bridge listening on http://{}", server_address);
        thread::spawn(move || {
            runtime.block_on(server);
            error!("HTTP bridge stopped");
        });
        Ok(())
    }

    pub fn publish(&self, model: &ReportModel) {
        update(&self.state, |report| *report = model.clone());
        info!(
            "published report: batch {}, manual {}",
            model.batch.is_some(),
            model.manual.is_some()
        );
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> ReportModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
