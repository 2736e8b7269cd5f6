use crate::api::pagination::deserialize_optional_u64;
use crate::api::pagination::PaginationParams;
use crate::api::{error_response, success_paginated_response, success_response};
use crate::logging::TraceId;
use crate::maintenance::{self, MaintenanceOutcome, PipelineError};
use crate::middleware::Requester;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, Utc};
use infrasight_analysis::error::AnalysisError;
use infrasight_common::types::{Channel, MaintenanceRecord, MeasureSet};
use infrasight_storage::{MaintenanceFilter, StorageError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// 预测性维护报告
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceReport {
    /// 下一时刻温度预测值（°C）
    pub temperature_prediction: f64,
    /// 下一时刻湿度预测值（%）
    pub humidity_prediction: f64,
    /// 下一时刻平均加速度预测值
    pub acceleration_prediction: f64,
    /// 下一时刻压力预测值
    pub pressure_prediction: f64,
    /// 各通道建议措施
    pub measures: MeasureSet,
    /// 参与拟合的样本数
    pub observations: usize,
    /// 超过告警阈值的通道
    pub alerts: Vec<Channel>,
    /// 维护记录 ID（保存失败时为 null）
    pub record_id: Option<String>,
    /// 维护记录是否已保存
    pub persisted: bool,
}

impl From<MaintenanceOutcome> for MaintenanceReport {
    fn from(outcome: MaintenanceOutcome) -> Self {
        let persisted = outcome.persisted();
        let predictions = outcome.analysis.predictions;
        Self {
            temperature_prediction: predictions.temperature,
            humidity_prediction: predictions.humidity,
            acceleration_prediction: predictions.acceleration,
            pressure_prediction: predictions.pressure,
            measures: outcome.analysis.measures,
            observations: outcome.analysis.observations,
            alerts: outcome.alerted,
            record_id: outcome.record_id,
            persisted,
        }
    }
}

/// 已保存的维护记录，字段命名与 [`MaintenanceReport`] 一致（camelCase）
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecordView {
    /// 维护记录 ID
    pub id: String,
    /// 温度预测值（°C）
    pub temperature_prediction: f64,
    /// 湿度预测值（%）
    pub humidity_prediction: f64,
    /// 平均加速度预测值
    pub acceleration_prediction: f64,
    /// 压力预测值
    pub pressure_prediction: f64,
    /// 各通道建议措施
    pub measures: MeasureSet,
    /// 请求者身份
    pub requested_by: String,
    /// 创建时间（UTC）
    pub timestamp: DateTime<Utc>,
}

impl From<MaintenanceRecord> for MaintenanceRecordView {
    fn from(record: MaintenanceRecord) -> Self {
        Self {
            id: record.id,
            temperature_prediction: record.predictions.temperature,
            humidity_prediction: record.predictions.humidity,
            acceleration_prediction: record.predictions.acceleration,
            pressure_prediction: record.predictions.pressure,
            measures: record.measures,
            requested_by: record.requested_by,
            timestamp: record.timestamp,
        }
    }
}

/// 运行预测性维护：基于全部传感器数据预测下一时刻的温度、湿度、加速度与压力，
/// 给出建议措施，超过阈值时向请求者发送告警，并保存维护记录。
/// 鉴权：需要请求者身份头（默认 `x-requester`）。
#[utoipa::path(
    get,
    path = "/v1/predictive-maintenance",
    tag = "Maintenance",
    security(("requester_auth" = [])),
    responses(
        (status = 200, description = "预测性维护报告", body = MaintenanceReport),
        (status = 401, description = "缺少请求者身份", body = crate::api::ApiError),
        (status = 422, description = "传感器数据不足或无效", body = crate::api::ApiError),
        (status = 500, description = "读取传感器数据失败", body = crate::api::ApiError)
    )
)]
async fn predictive_maintenance(
    Extension(trace_id): Extension<TraceId>,
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    match maintenance::run(&state, &requester).await {
        Ok(outcome) => success_response(StatusCode::OK, &trace_id, MaintenanceReport::from(outcome)),
        Err(PipelineError::Read(e)) => {
            tracing::error!(trace_id = %trace_id.0, error = %e, "Failed to read sensor data");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Failed to read sensor data",
            )
        }
        Err(PipelineError::Analysis(e @ AnalysisError::InsufficientData { .. })) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &trace_id,
            "insufficient_data",
            &e.to_string(),
        ),
        Err(PipelineError::Analysis(e)) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &trace_id,
            "invalid_data",
            &e.to_string(),
        ),
    }
}

/// 维护记录查询参数
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ListReportsParams {
    /// 按日期（UTC，YYYY-MM-DD）过滤
    #[param(required = false)]
    date: Option<String>,
    /// 按请求者精确匹配
    #[param(required = false)]
    #[serde(rename = "requestedBy", alias = "requested_by")]
    requested_by: Option<String>,
    /// 每页条数（默认 20）
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    limit: Option<u64>,
    /// 偏移量（默认 0）
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    offset: Option<u64>,
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD")),
    }
}

/// 分页查询维护记录。
/// 默认排序：`timestamp` 倒序；默认分页：`limit=20&offset=0`。
#[utoipa::path(
    get,
    path = "/v1/reports",
    tag = "Maintenance",
    params(ListReportsParams),
    responses(
        (status = 200, description = "维护记录分页列表", body = Vec<MaintenanceRecordView>),
        (status = 400, description = "日期格式错误", body = crate::api::ApiError),
        (status = 500, description = "存储错误", body = crate::api::ApiError)
    )
)]
async fn list_reports(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<ListReportsParams>,
) -> impl IntoResponse {
    let date = match parse_date(params.date.as_deref()) {
        Ok(d) => d,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg),
    };
    let filter = MaintenanceFilter {
        date,
        requested_by: params.requested_by.filter(|s| !s.trim().is_empty()),
    };
    let limit = PaginationParams::resolve_limit(params.limit);
    let offset = PaginationParams::resolve_offset(params.offset);

    let total = match state.store.count_maintenance_records(&filter).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to count maintenance records");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Database error",
            );
        }
    };

    match state.store.list_maintenance_records(&filter, limit, offset).await {
        Ok(items) => {
            let items: Vec<MaintenanceRecordView> = items.into_iter().map(Into::into).collect();
            success_paginated_response(StatusCode::OK, &trace_id, items, total, limit, offset)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list maintenance records");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Database error",
            )
        }
    }
}

/// 获取单条维护记录。
#[utoipa::path(
    get,
    path = "/v1/reports/{id}",
    tag = "Maintenance",
    params(("id" = String, Path, description = "维护记录 ID")),
    responses(
        (status = 200, description = "维护记录", body = MaintenanceRecordView),
        (status = 404, description = "记录不存在", body = crate::api::ApiError)
    )
)]
async fn get_report(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_maintenance_record(&id).await {
        Ok(record) => success_response(StatusCode::OK, &trace_id, MaintenanceRecordView::from(record)),
        Err(StorageError::NotFound { .. }) => error_response(
            StatusCode::NOT_FOUND,
            &trace_id,
            "not_found",
            "Maintenance record not found",
        ),
        Err(e) => {
            tracing::error!(error = %e, id = %id, "Failed to load maintenance record");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &trace_id,
                "storage_error",
                "Database error",
            )
        }
    }
}

pub fn pipeline_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(predictive_maintenance))
}

pub fn report_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_reports))
        .routes(routes!(get_report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_day_and_blank() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(parse_date(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_date(Some("2024-05-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert!(parse_date(Some("01/05/2024")).is_err());
    }
}
