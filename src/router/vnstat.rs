use crate::error_code::ErrorCode;
use crate::granularity::{Granularity, QueryProfiles};
use crate::model::jsend::JsendResponse;
use crate::model::traffic::TrafficReport;
use crate::service::vnstat_service::{self, QueryError};
use crate::validation::{Payload, ValidationErrors};
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info, trace};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type Rejection = (StatusCode, Json<JsendResponse<ValidationErrors>>);
type QueryParams = Result<Query<HashMap<String, String>>, QueryRejection>;
type TrafficResult = Result<Json<JsendResponse<TrafficReport>>, Rejection>;

pub fn router(profiles: Arc<QueryProfiles>) -> Router {
    Router::new()
        .route(Granularity::Year.path(), get(get_years).post(get_years))
        .route(Granularity::Month.path(), get(get_months).post(get_months))
        .route(Granularity::Day.path(), get(get_days).post(get_days))
        .route(Granularity::Hour.path(), get(get_hours).post(get_hours))
        .with_state(profiles)
}

async fn get_years(
    State(profiles): State<Arc<QueryProfiles>>,
    query: QueryParams,
    body: Bytes,
) -> TrafficResult {
    get_traffic(&profiles, Granularity::Year, query, body).await
}

async fn get_months(
    State(profiles): State<Arc<QueryProfiles>>,
    query: QueryParams,
    body: Bytes,
) -> TrafficResult {
    get_traffic(&profiles, Granularity::Month, query, body).await
}

async fn get_days(
    State(profiles): State<Arc<QueryProfiles>>,
    query: QueryParams,
    body: Bytes,
) -> TrafficResult {
    get_traffic(&profiles, Granularity::Day, query, body).await
}

async fn get_hours(
    State(profiles): State<Arc<QueryProfiles>>,
    query: QueryParams,
    body: Bytes,
) -> TrafficResult {
    get_traffic(&profiles, Granularity::Hour, query, body).await
}

async fn get_traffic(
    profiles: &QueryProfiles,
    granularity: Granularity,
    query: QueryParams,
    body: Bytes,
) -> TrafficResult {
    trace!("{} traffic requested", granularity);

    let Query(query) = query.map_err(invalid_query)?;
    let payload = read_payload(query, &body)?;
    let report = vnstat_service::query_traffic(profiles.get(granularity), &payload)
        .await
        .map_err(reject)?;

    Ok(Json(JsendResponse::success_with_data(report)))
}

/// The JSON body when one was sent, the query string otherwise.
fn read_payload(query: HashMap<String, String>, body: &[u8]) -> Result<Payload, Rejection> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(query
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(_) => Err(invalid_body()),
        Err(e) => {
            info!("err: {}", e);
            Err(invalid_body())
        }
    }
}

fn invalid_body() -> Rejection {
    (
        StatusCode::BAD_REQUEST,
        Json(JsendResponse::fail(ErrorCode::InvalidRequestBody)),
    )
}

fn invalid_query(err: QueryRejection) -> Rejection {
    info!("err: {}", err.body_text());
    invalid_body()
}

fn reject(err: QueryError) -> Rejection {
    match err {
        QueryError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(JsendResponse::fail_with_message_data(
                ErrorCode::ValidationFailed.message().to_string(),
                errors,
                ErrorCode::ValidationFailed,
            )),
        ),
        QueryError::Collector(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsendResponse::error(ErrorCode::GetDataFailed)),
        ),
        QueryError::Data(e) => {
            error!("err: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(JsendResponse::error_with_message(
                    e.to_string(),
                    ErrorCode::InvalidTrafficData,
                )),
            )
        }
    }
}
