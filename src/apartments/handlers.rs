//! HTTP handlers for apartment operations
//!
//! Thin glue over the store and media components: decode the request,
//! call the stores, assemble the response envelope. All error mapping
//! lives in `core::error`.

use axum::Json;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use super::model::{Apartment, ApartmentWithImages, NewApartment};
use super::store::ApartmentStore;
use crate::core::{ApiError, ApiResponse, ValidationError};
use crate::media::store::{FsMediaStore, ImageUpload, MediaError, parse_image_name};
use crate::query::{parse_filters, translate};

/// Application state shared across handlers
///
/// Both store handles are constructed at bootstrap and injected here;
/// nothing reaches for ambient global connections.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ApartmentStore>,
    pub media: Arc<FsMediaStore>,
}

/// Query parameters of the filtered listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// JSON array of filter descriptors
    pub filters: Option<String>,
}

/// Decoded creation request: entity fields plus any attached files
///
/// Accepts either a JSON body or a multipart form (text fields + file
/// parts). Multipart text fields are kept as strings; the payload
/// validation layer coerces them.
#[derive(Debug)]
pub struct CreateApartmentRequest {
    pub payload: Value,
    pub files: Vec<ImageUpload>,
}

impl<S> FromRequest<S> for CreateApartmentRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let invalid_body = |message: String| {
            ApiError::Validation(ValidationError::InvalidBody { message })
        };

        if !is_multipart(req.headers()) {
            let Json(payload) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| invalid_body(e.to_string()))?;
            return Ok(Self {
                payload,
                files: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| invalid_body(e.to_string()))?;

        let mut fields = serde_json::Map::new();
        let mut files = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| invalid_body(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if field.file_name().is_some() {
                // file parts become the upload batch, in arrival order
                let file_name = field.file_name().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| invalid_body(e.to_string()))?;
                files.push(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| invalid_body(e.to_string()))?;
                fields.insert(name, Value::String(text));
            }
        }

        Ok(Self {
            payload: Value::Object(fields),
            files,
        })
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Create an apartment, persisting any attached photos under its new id
///
/// Validation happens before any persistence. A media failure after the
/// entity write answers 500 while the entity itself stays retrievable.
pub async fn create_apartment(
    State(state): State<AppState>,
    request: CreateApartmentRequest,
) -> Result<ApiResponse, ApiError> {
    let new = NewApartment::from_payload(&request.payload)?;

    let apartment = state.store.create(new).await?;
    tracing::info!(apartment_id = %apartment.id, files = request.files.len(), "apartment created");

    state.media.store_batch(&apartment.id, &request.files).await?;
    let images = state.media.resolve(&apartment.id).await?;

    Ok(ApiResponse::created(json!({
        "message": "Apartment created successfully",
        "apartment": apartment.with_images(images),
    })))
}

/// List apartments constrained by the `filters` query parameter
pub async fn list_apartments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    // historical contract: an absent parameter answers 400 with an empty body
    let Some(raw) = params.filters.as_deref() else {
        return Ok(StatusCode::BAD_REQUEST.into_response());
    };

    let descriptors = parse_filters(raw)?;
    let apartments = match translate(&descriptors) {
        Some(query) => {
            tracing::debug!(?query, "compiled filter query");
            state.store.find(&query).await?
        }
        // an empty descriptor list means "no filter", not "match nothing"
        None => state.store.list().await?,
    };

    let apartments = enrich_all(&state.media, apartments).await?;
    Ok(Json(json!({ "apartments": apartments })).into_response())
}

/// List every apartment, unfiltered
///
/// An empty listing is a plain 200 with an empty array; only store
/// failures are 500s.
pub async fn list_all_apartments(
    State(state): State<AppState>,
) -> Result<ApiResponse, ApiError> {
    let apartments = state.store.list().await?;
    let apartments = enrich_all(&state.media, apartments).await?;

    Ok(ApiResponse::ok(json!({ "apartments": apartments })))
}

/// Fetch one apartment by identifier
pub async fn get_apartment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse, ApiError> {
    // a path segment that is not a Uuid names an identifier that was
    // never assigned, so it maps to 404 like any other unknown id
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::apartment_not_found())?;

    let apartment = state
        .store
        .get(&id)
        .await?
        .ok_or_else(ApiError::apartment_not_found)?;
    let images = state.media.resolve(&id).await?;

    Ok(ApiResponse::ok(json!({
        "apartment": apartment.with_images(images),
    })))
}

/// Serve the stored bytes of one image
pub async fn get_image(
    State(state): State<AppState>,
    Path((apartment_id, file)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound { resource: "Image" };

    let id = Uuid::parse_str(&apartment_id).map_err(|_| not_found())?;
    let index = parse_image_name(&file).ok_or_else(not_found)?;

    let bytes = state.media.retrieve(&id, index).await?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

/// Resolve image references for each record, concurrently
async fn enrich_all(
    media: &FsMediaStore,
    apartments: Vec<Apartment>,
) -> Result<Vec<ApartmentWithImages>, ApiError> {
    let enriched = try_join_all(apartments.into_iter().map(|apartment| async move {
        let images = media.resolve(&apartment.id).await?;
        Ok::<_, MediaError>(apartment.with_images(images))
    }))
    .await?;

    Ok(enriched)
}
