//! Auto.dev-backed endpoints: listing photos and the image proxy.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::http::validation::present;
use crate::observability::metrics;
use crate::vehicles::{color_filter, summarize, ListingQuery};

const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

#[derive(Debug, Default, Deserialize)]
pub struct CarQuery {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub color: Option<String>,
}

pub async fn car_photos(
    State(state): State<AppState>,
    Query(query): Query<CarQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (Some(make), Some(model), Some(year)) = (
        present(query.make.as_deref()),
        present(query.model.as_deref()),
        present(query.year.as_deref()),
    ) else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            None,
            "Make, model and year are required",
        ));
    };

    let lookup = ListingQuery {
        make: make.to_string(),
        model: model.to_string(),
        year: year.to_string(),
        color: query.color.as_deref().and_then(color_filter),
    };
    let listings = state
        .vehicles
        .listings(&lookup)
        .await
        .map_err(|e| ApiError::autodev(&e))?;

    let summary = summarize(&listings);
    tracing::debug!(
        listings = listings.len(),
        photos = summary.photos.len(),
        prices = summary.prices.len(),
        "Listings summarized"
    );

    Ok(Json(json!({
        "success": true,
        "count": summary.photos.len(),
        "make": make,
        "model": model,
        "year": year,
        "priceCount": summary.prices.len(),
        "prices": summary.prices,
        "averagePrice": summary.average_price,
        "data": summary.photos,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct PhotoQuery {
    pub url: Option<String>,
}

/// Relay an image so the browser can render it without a cross-origin fetch.
pub async fn car_photo_proxy(
    State(state): State<AppState>,
    Query(query): Query<PhotoQuery>,
) -> Result<Response, ApiError> {
    let raw = present(query.url.as_deref()).ok_or_else(|| {
        ApiError::new(StatusCode::BAD_REQUEST, None, "Image URL is required")
    })?;
    let url = Url::parse(raw)
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .ok_or_else(|| ApiError::bad_request("INVALID_URL", "Image URL must be http or https"))?;

    match state.vehicles.fetch_photo(&url).await {
        Ok(photo) => {
            let content_type = photo
                .content_type
                .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());
            Ok(([(header::CONTENT_TYPE, content_type)], photo.bytes).into_response())
        }
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Image proxy failed");
            metrics::record_upstream_failure("photo");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&e.to_string()),
                "Failed to fetch image",
            ))
        }
    }
}
