use crate::api::pagination::PaginationParams;
use crate::api::{error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use infrasight_common::types::{
    ClimateReading, MotionReading, NewClimateReading, NewMotionReading, MAX_READING_MAGNITUDE,
};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// 原始读数分页数据
#[derive(Serialize, ToSchema)]
pub struct ReadingsFeed {
    /// 温湿度读数（新的在前）
    pub climate: Vec<ClimateReading>,
    /// 温湿度读数总数
    pub climate_total: u64,
    /// 加速度与压力读数（新的在前）
    pub motion: Vec<MotionReading>,
    /// 加速度与压力读数总数
    pub motion_total: u64,
    /// 每页数量
    pub limit: usize,
    /// 偏移量
    pub offset: usize,
}

fn out_of_range(trace_id: &str, field: &str) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        trace_id,
        "bad_request",
        &format!("{field} must be a finite number within ±{MAX_READING_MAGNITUDE:e}"),
    )
}

/// 上报一条温湿度读数。
/// 数值的绝对值不得超过 1e9。
#[utoipa::path(
    post,
    path = "/v1/readings/climate",
    tag = "Readings",
    request_body = NewClimateReading,
    responses(
        (status = 201, description = "读数已保存", body = ClimateReading),
        (status = 400, description = "读数无效", body = crate::api::ApiError),
        (status = 500, description = "存储错误", body = crate::api::ApiError)
    )
)]
async fn create_climate_reading(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<NewClimateReading>,
) -> impl IntoResponse {
    if let Some(field) = req.out_of_range_field() {
        return out_of_range(&trace_id, field);
    }

    match state.store.insert_climate_reading(&req).await {
        Ok(reading) => success_response(StatusCode::CREATED, &trace_id, reading),
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert climate reading");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// 上报一条加速度与压力读数。
/// 数值的绝对值不得超过 1e9。
#[utoipa::path(
    post,
    path = "/v1/readings/motion",
    tag = "Readings",
    request_body = NewMotionReading,
    responses(
        (status = 201, description = "读数已保存", body = MotionReading),
        (status = 400, description = "读数无效", body = crate::api::ApiError),
        (status = 500, description = "存储错误", body = crate::api::ApiError)
    )
)]
async fn create_motion_reading(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<NewMotionReading>,
) -> impl IntoResponse {
    if let Some(field) = req.out_of_range_field() {
        return out_of_range(&trace_id, field);
    }

    match state.store.insert_motion_reading(&req).await {
        Ok(reading) => success_response(StatusCode::CREATED, &trace_id, reading),
        Err(e) => {
            tracing::error!(error = %e, "Failed to insert motion reading");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// 分页查询两张原始读数表。
/// 默认排序：`id` 倒序；默认分页：`limit=20&offset=0`。
#[utoipa::path(
    get,
    path = "/v1/readings",
    tag = "Readings",
    params(PaginationParams),
    responses(
        (status = 200, description = "原始读数", body = ReadingsFeed),
        (status = 500, description = "存储错误", body = crate::api::ApiError)
    )
)]
async fn list_readings(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let limit = pagination.limit();
    let offset = pagination.offset();
    let store = &state.store;

    let feed = async {
        Ok::<_, infrasight_storage::StorageError>(ReadingsFeed {
            climate: store.list_climate_readings(limit, offset).await?,
            climate_total: store.count_climate_readings().await?,
            motion: store.list_motion_readings(limit, offset).await?,
            motion_total: store.count_motion_readings().await?,
            limit,
            offset,
        })
    }
    .await;

    match feed {
        Ok(feed) => success_response(StatusCode::OK, &trace_id, feed),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list readings");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Database error",
            )
        }
    }
}

pub fn reading_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_climate_reading))
        .routes(routes!(create_motion_reading))
        .routes(routes!(list_readings))
}
