//! Transactions endpoints - HTMX fragments and statement downloads
//!
//! Endpoints:
//! - htmx_transactions_list: User transactions table page (HTML fragment)
//! - export_statement: CSV or PDF statement (attachment)

use super::TRANSACTIONS_LAYOUT;
use crate::error::{ApiError, ApiResult};
use crate::routes::{page_param, table_response};
use crate::{session_from_headers, AppState};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use cardweb_core::{ExportFormat, TransactionFilter};
use cardweb_utils::download_filename;
use std::collections::HashMap;

/// HTMX: User transactions - Partial page update.
/// Empty filter fields are left out of the request.
pub async fn htmx_transactions_list(
    state: State<AppState>,
    headers: HeaderMap,
    params: Query<HashMap<String, String>>,
    filter: Query<TransactionFilter>,
) -> ApiResult<Response> {
    filter.validate().map_err(ApiError::bad_request)?;
    let session = session_from_headers(&headers);
    table_response(&state, &session, &TRANSACTIONS_LAYOUT, page_param(&params), filter.to_query()).await
}

/// Statement download, proxied from the API
pub async fn export_statement(
    state: State<AppState>,
    headers: HeaderMap,
    format: Path<String>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let format: ExportFormat = format.parse().map_err(ApiError::bad_request)?;
    let session = session_from_headers(&headers);
    let download = state
        .client
        .export_statement(&session, format, page_param(&params), state.viewer.page_size())
        .await?;

    let filename = download_filename("transactions", format.extension(), chrono::Utc::now());
    log::info!("statement {} ({} bytes)", filename, download.body.len());

    let mut response = (StatusCode::OK, download.body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&download.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(format.content_type())),
    );
    if let Ok(disposition) = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename)) {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok(response)
}
