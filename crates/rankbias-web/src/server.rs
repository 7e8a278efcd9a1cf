use std::sync::Arc;

use axum::{Json, Router, extract::State, response::Html, routing::get};
use rankbias::types::LocationsResponse;
use rankbias::{Geocoder, MemoryCache, PageFetcher, Pipeline, PipelineOutcome, sample_recruits};
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

const INDEX_HTML: &str = include_str!("./index.html");

#[derive(Debug, Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    // One data request runs the pipeline at a time so geocoding stays sequential.
    run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Live rankings page, public Nominatim and a fresh process-wide cache.
    pub fn live() -> Result<Self, anyhow::Error> {
        let fetcher = PageFetcher::new()?;
        let geocoder = Geocoder::new(Arc::new(MemoryCache::new()))?;
        Ok(Self::new(Pipeline::new(fetcher, geocoder)))
    }

    pub async fn locations(&self) -> LocationsResponse {
        let outcome = {
            let _guard = self.run_lock.lock().await;
            self.pipeline.run().await
        };

        let locations = match outcome {
            PipelineOutcome::Recruits(recruits) => {
                log::info!("Returning {} recruits", recruits.len());
                recruits
            }
            PipelineOutcome::Empty => {
                log::warn!("Using sample data");
                sample_recruits()
            }
        };

        LocationsResponse { locations }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/data", get(get_data))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_data(State(state): State<AppState>) -> Json<LocationsResponse> {
    log::info!("Fetching recruit data...");
    Json(state.locations().await)
}
