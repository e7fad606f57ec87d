use crate::{AppState, error::AppError};
use analytics::{
    AnalyticsEngine, AnalyticsError, BatchAnalysis, ChartData, ChartFailure, ChartOptions, ChartSelection,
    Prediction,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use core_types::{ChartType, Series};
use dataset_store::{ColumnMeta, Dataset, DatasetSummary, NewDataset, Preview};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Rows returned by the preview endpoint.
pub const PREVIEW_ROWS: usize = 200;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub dataset: DatasetSummary,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    pub x: String,
    pub y: Option<String>,
    #[serde(rename = "type", default)]
    pub chart_type: Option<ChartType>,
    #[serde(flatten)]
    pub options: ChartOptions,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub x: String,
    pub y: String,
    #[serde(default = "default_years")]
    pub years: i64,
}
fn default_years() -> i64 { 1 }

/// A column pair picked for one chart type.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnPair {
    pub x: String,
    pub y: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub x: String,
    pub y: Option<String>,
    #[serde(default)]
    pub overrides: BTreeMap<ChartType, ColumnPair>,
}

/// Runs CPU-bound engine work off the async workers.
async fn run_engine<T, F>(engine: &Arc<AnalyticsEngine>, job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AnalyticsEngine) -> T + Send + 'static,
{
    let engine = Arc::clone(engine);
    tokio::task::spawn_blocking(move || job(&engine))
        .await
        .map_err(|e| AppError::Internal(format!("analysis task failed: {}", e)))
}

/// # GET /api/health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// # POST /api/upload
pub async fn upload_dataset(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(upload), _): WithRejection<Json<NewDataset>, AppError>,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let dataset = state.repo.save_dataset(upload).await?;
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse { success: true, dataset }),
    ))
}

/// # GET /api/datasets
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetSummary>> {
    Json(state.repo.list_datasets().await)
}

/// # GET /api/dataset/:id/preview
pub async fn preview_dataset(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Preview>, AppError> {
    let dataset = state.repo.get_dataset(id).await?;
    Ok(Json(dataset.preview(PREVIEW_ROWS)))
}

/// # GET /api/dataset/:id/columns
pub async fn dataset_columns(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ColumnMeta>>, AppError> {
    let dataset = state.repo.get_dataset(id).await?;
    Ok(Json(dataset.columns.clone()))
}

/// # POST /api/dataset/:id/chart
pub async fn chart(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<ChartRequest>, AppError>,
) -> Result<Json<ChartData>, AppError> {
    let dataset = state.repo.get_dataset(id).await?;
    let chart_type = request.chart_type.unwrap_or(ChartType::Bar);
    let series = dataset.series(&request.x, request.y.as_deref())?;
    let options = request.options;

    let data = run_engine(&state.engine, move |engine| {
        engine.chart(&series, chart_type, &options)
    })
    .await??;
    Ok(Json(data))
}

/// # POST /api/dataset/:id/predict
pub async fn predict(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<PredictRequest>, AppError>,
) -> Result<Json<Prediction>, AppError> {
    let dataset = state.repo.get_dataset(id).await?;
    let series = dataset.series(&request.x, Some(&request.y))?;
    let years = request.years;

    let prediction = run_engine(&state.engine, move |engine| engine.predict(&series, years)).await??;
    tracing::info!(dataset_id = %id, x = %request.x, y = %request.y, years, "Forecast served.");
    Ok(Json(prediction))
}

/// # POST /api/dataset/:id/analyze
///
/// Every chart type is analysed with the request's `x`/`y` unless `overrides`
/// names another column pair for it. A chart whose columns cannot be
/// extracted is reported as a failure alongside those the engine rejects.
pub async fn analyze(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<AnalyzeRequest>, AppError>,
) -> Result<Json<BatchAnalysis>, AppError> {
    let dataset = state.repo.get_dataset(id).await?;
    let base = dataset.series(&request.x, request.y.as_deref())?;
    let (selections, mut extraction_failures) = selections_for(&dataset, &base, &request.overrides);

    let mut batch = run_engine(&state.engine, move |engine| engine.analyze_selections(&selections)).await?;
    if !extraction_failures.is_empty() {
        batch.failures.append(&mut extraction_failures);
        batch.failures.sort_by_key(|f| f.chart_type);
    }

    tracing::info!(
        dataset_id = %id,
        reports = batch.reports.len(),
        failures = batch.failures.len(),
        "Analysis served."
    );
    Ok(Json(batch))
}

fn selections_for(
    dataset: &Dataset,
    base: &Series,
    overrides: &BTreeMap<ChartType, ColumnPair>,
) -> (Vec<ChartSelection>, Vec<ChartFailure>) {
    let mut selections = Vec::with_capacity(ChartType::GENERATION_ORDER.len());
    let mut failures = Vec::new();

    for chart_type in ChartType::GENERATION_ORDER {
        let series = match overrides.get(&chart_type) {
            None => Ok(base.clone()),
            Some(pair) => dataset.series(&pair.x, pair.y.as_deref()),
        };
        match series {
            Ok(series) => selections.push(ChartSelection::new(chart_type, series)),
            Err(e) => failures.push(ChartFailure {
                chart_type,
                error: AnalyticsError::InvalidColumnSelection(e.to_string()).to_string(),
            }),
        }
    }
    (selections, failures)
}

/// # DELETE /api/dataset/:id
pub async fn delete_dataset(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.repo.delete_dataset(id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        message: "Dataset deleted successfully".to_string(),
    }))
}
