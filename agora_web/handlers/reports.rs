use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agora_app::{
    cqrs::queries::{GetReportById, ListReports},
    queries_handlers::{GetReportByIdHandler, ListReportsHandler},
};
use agora_types::report::{Report, ReportOutcome, ReportReason, ReportStatus};

use crate::http::AppState;

use super::error_response;

#[derive(Deserialize)]
pub struct SubmitReportRequest {
    pub post_id: Uuid,
    pub reporter_user_id: Uuid,
    pub reason: ReportReason,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewReportRequest {
    pub admin_user_id: Uuid,
}

#[derive(Deserialize)]
pub struct DecideReportRequest {
    pub admin_user_id: Uuid,
    pub outcome: ReportOutcome,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct ListReportsParams {
    pub status: Option<ReportStatus>,
    pub limit: Option<i64>,
}

/// A decision response tells the caller what happened to the mails without
/// ever turning an undelivered mail into a request failure.
#[derive(Serialize)]
pub struct DecisionResponse {
    pub report: Report,
    pub reporter_notified: bool,
    pub author_warned: Option<bool>,
}

/// POST /reports
pub async fn submit_report(
    State(state): State<AppState>,
    Json(body): Json<SubmitReportRequest>,
) -> Response {
    match state
        .moderation
        .submit_report(
            body.post_id,
            body.reporter_user_id,
            body.reason,
            body.description,
        )
        .await
    {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// GET /reports
pub async fn list_reports(
    State(state): State<AppState>,
    Query(params): Query<ListReportsParams>,
) -> Response {
    let query = ListReports {
        status: params.status,
        limit: params.limit.unwrap_or(50).clamp(1, 200),
    };

    match state.app_bus.query(query, ListReportsHandler::new()).await {
        Ok(reports) => Json(reports).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// GET /reports/{id}
pub async fn get_report(State(state): State<AppState>, Path(report_id): Path<Uuid>) -> Response {
    match state
        .app_bus
        .query(GetReportById { report_id }, GetReportByIdHandler::new())
        .await
    {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// POST /reports/{id}/review
pub async fn review_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    Json(body): Json<ReviewReportRequest>,
) -> Response {
    match state
        .moderation
        .review_report(report_id, body.admin_user_id)
        .await
    {
        Ok(report) => Json(report).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

/// POST /reports/{id}/decision
pub async fn decide_report(
    State(state): State<AppState>,
    Path(report_id): Path<Uuid>,
    Json(body): Json<DecideReportRequest>,
) -> Response {
    match state
        .moderation
        .decide_report(report_id, body.admin_user_id, body.outcome, body.note)
        .await
    {
        Ok(notices) => Json(DecisionResponse {
            report: notices.report,
            reporter_notified: notices.reporter_notice.is_delivered(),
            author_warned: notices.author_warning.map(|w| w.is_delivered()),
        })
        .into_response(),
        Err(e) => error_response(e).into_response(),
    }
}
