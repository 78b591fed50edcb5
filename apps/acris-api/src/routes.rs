use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use acris_domain::AnyCriteria;
use acris_service::{
	CancellationToken, CountResponse, DocumentIdRequest, DocumentTypeRequest, Error,
	ParcelRequest, PartyRequest, PipelineOutcome, ReelPageRequest, TransactionRequest,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/parcel", post(search_parcel))
		.route("/v1/search/party", post(search_party))
		.route("/v1/search/document_type", post(search_document_type))
		.route("/v1/search/reel_page", post(search_reel_page))
		.route("/v1/search/document_id", post(search_document_id))
		.route("/v1/search/transaction", post(search_transaction))
		.route("/v1/count", post(count))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

// Each handler owns a token whose guard fires when the request future is dropped, so a client
// that goes away takes its in-flight dataset requests with it.

async fn search_parcel(
	State(state): State<AppState>,
	Json(payload): Json<ParcelRequest>,
) -> Result<Json<PipelineOutcome>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let outcome = state.service.search_parcel_with_cancel(payload, cancel).await?;

	Ok(Json(outcome))
}

async fn search_party(
	State(state): State<AppState>,
	Json(payload): Json<PartyRequest>,
) -> Result<Json<PipelineOutcome>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let outcome = state.service.search_party_with_cancel(payload, cancel).await?;

	Ok(Json(outcome))
}

async fn search_document_type(
	State(state): State<AppState>,
	Json(payload): Json<DocumentTypeRequest>,
) -> Result<Json<PipelineOutcome>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let outcome = state.service.search_document_type_with_cancel(payload, cancel).await?;

	Ok(Json(outcome))
}

async fn search_reel_page(
	State(state): State<AppState>,
	Json(payload): Json<ReelPageRequest>,
) -> Result<Json<PipelineOutcome>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let outcome = state.service.search_reel_page_with_cancel(payload, cancel).await?;

	Ok(Json(outcome))
}

async fn search_document_id(
	State(state): State<AppState>,
	Json(payload): Json<DocumentIdRequest>,
) -> Result<Json<PipelineOutcome>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let outcome = state.service.search_document_id_with_cancel(payload, cancel).await?;

	Ok(Json(outcome))
}

async fn search_transaction(
	State(state): State<AppState>,
	Json(payload): Json<TransactionRequest>,
) -> Result<Json<PipelineOutcome>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let outcome = state.service.search_transaction_with_cancel(payload, cancel).await?;

	Ok(Json(outcome))
}

async fn count(
	State(state): State<AppState>,
	Json(payload): Json<AnyCriteria>,
) -> Result<Json<CountResponse>, ApiError> {
	let cancel = CancellationToken::new();
	let _guard = cancel.clone().drop_guard();
	let response = state.service.count_with_cancel(payload, cancel).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::MissingCriteria { fields, .. } =>
				Self::new(StatusCode::BAD_REQUEST, "MISSING_CRITERIA", message, Some(fields)),
			Error::InvalidRequest { .. } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::NotFound { .. } | Error::NoResults { .. } | Error::UnknownDocumentClass { .. } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Upstream { .. } | Error::Incomplete { .. } => {
				tracing::error!(error = %message, "Upstream dataset request failed.");

				Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", message, None)
			},
			Error::Cancelled | Error::DeadlineExceeded { .. } =>
				Self::new(StatusCode::GATEWAY_TIMEOUT, "DEADLINE_EXCEEDED", message, None),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
