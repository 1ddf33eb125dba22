//! HTTP surface of the kiosk controller.
//!
//! | Path | Description |
//! |------|-------------|
//! | `/` | Upload page for operators on the LAN |
//! | `/favicon.ico` | Favicon from the templates directory |
//! | `/{*page}` | Any other `.html` page in the templates directory |
//! | `/assets/{display}/{file}` | Uploaded media |
//! | `/api/displaynames` | `[{id, name}]` for every display |
//! | `/api/upload` | Multipart upload that retargets a display |
//!
//! The server binds `0.0.0.0` so phones and laptops on the same network can
//! reach the upload page. Upload bodies are streamed to a staging file and
//! never held in memory whole.

use anyhow::{Context, Result};
use axum::extract::multipart::Field;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::path::Path as FilePath;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::core::models::{
    check_file_name, is_plain_file_name, DisplayNameEntry, StagedFile, UploadForm,
    UploadReceipt, UploadRejection, UploadedFilePart,
};
use crate::core::orchestrators::KioskContext;
use crate::global_constants::{
    ERROR_INVALID_FILE_NAME, ERROR_INVALID_FILE_TYPE, FAVICON_FILE_NAME, LOG_TAG_HTTP,
    LOG_TAG_UPLOAD, UPLOAD_PAGE_TEMPLATE,
};
use crate::presentation::api_error::ApiError;
use crate::presentation::page_renderer::render_page;

/// Shared state passed to all request handlers.
#[derive(Clone)]
pub struct HttpState {
    pub context: Arc<KioskContext>,
    pub local_ip_address: String,
}

pub fn build_router(state: HttpState) -> Router {
    let settings = state.context.settings();
    let assets_service = ServeDir::new(&settings.assets_directory);
    let max_upload_bytes = settings.max_upload_bytes();

    Router::new()
        .route("/", get(handle_upload_page))
        .route("/favicon.ico", get(handle_favicon))
        .route("/{*page}", get(handle_named_page))
        .route("/api/displaynames", get(handle_display_names))
        .route("/api/upload", post(handle_upload))
        .nest_service("/assets", assets_service)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves until the listener fails. Run it on its own task.
pub async fn start_http_server(context: Arc<KioskContext>, local_ip_address: String) -> Result<()> {
    let port = context.settings().port;
    let app = build_router(HttpState {
        context,
        local_ip_address,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("{} Listening on http://{}", LOG_TAG_HTTP, addr);

    axum::serve(listener, app)
        .await
        .context("http server terminated unexpectedly")
}

async fn handle_upload_page(State(state): State<HttpState>) -> Result<Html<String>, ApiError> {
    render_named_template(&state, UPLOAD_PAGE_TEMPLATE).await
}

async fn handle_named_page(
    State(state): State<HttpState>,
    Path(page): Path<String>,
) -> Result<Html<String>, ApiError> {
    if !page.ends_with(".html") {
        return Err(ApiError::BadRequest(ERROR_INVALID_FILE_TYPE.to_string()));
    }
    if !is_plain_file_name(&page) {
        return Err(ApiError::BadRequest(ERROR_INVALID_FILE_NAME.to_string()));
    }

    render_named_template(&state, &page).await
}

async fn render_named_template(state: &HttpState, template_name: &str) -> Result<Html<String>, ApiError> {
    let settings = state.context.settings();

    let rendered = render_page(
        &settings.templates_directory,
        template_name,
        &state.local_ip_address,
        settings.port,
    )
    .await
    .map_err(|e| {
        log::error!("{} {}", LOG_TAG_HTTP, e);
        ApiError::Internal(e.to_string())
    })?;

    rendered.map(Html).ok_or(ApiError::NotFound)
}

async fn handle_favicon(State(state): State<HttpState>) -> Result<Response, ApiError> {
    let favicon_path = state
        .context
        .settings()
        .templates_directory
        .join(FAVICON_FILE_NAME);

    match tokio::fs::read(&favicon_path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/x-icon")], bytes).into_response()),
        Err(_) => Err(ApiError::NotFound),
    }
}

async fn handle_display_names(State(state): State<HttpState>) -> Json<Vec<DisplayNameEntry>> {
    Json(state.context.display_name_entries())
}

async fn handle_upload(
    State(state): State<HttpState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadReceipt>, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        log::warn!("{} not a multipart request: {}", LOG_TAG_UPLOAD, rejection);
        ApiError::from(UploadRejection::MissingFilePart)
    })?;

    let staging_directory = state.context.staging_directory().await.map_err(|e| {
        log::error!("{} no staging directory: {:#}", LOG_TAG_UPLOAD, e);
        ApiError::UploadFailed
    })?;

    let form = collect_upload_form(multipart, &staging_directory).await?;
    let upload = form.validate(state.context.displays()).map_err(|rejection| {
        log::warn!("{} rejected upload: {}", LOG_TAG_UPLOAD, rejection);
        ApiError::from(rejection)
    })?;

    log::info!(
        "{} {} -> {}",
        LOG_TAG_UPLOAD,
        upload.file_name,
        upload.display.name()
    );

    let receipt = state.context.accept_upload(upload).await.map_err(|e| {
        log::error!("{} failed to store upload: {:#}", LOG_TAG_UPLOAD, e);
        ApiError::UploadFailed
    })?;

    Ok(Json(receipt))
}

async fn collect_upload_form(
    mut multipart: Multipart,
    staging_directory: &FilePath,
) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let staged_file = match check_file_name(&file_name) {
                    Ok(()) => Some(stage_file_field(field, staging_directory).await?),
                    Err(_) => None,
                };
                form.file_part = Some(UploadedFilePart {
                    file_name,
                    staged_file,
                });
            }
            "displayName" => form.display_name = Some(field.text().await?),
            "displayId" => form.display_id = Some(field.text().await?),
            other => {
                log::debug!("{} ignoring form field {:?}", LOG_TAG_UPLOAD, other);
            }
        }
    }

    Ok(form)
}

// Any error drops the staged file, which deletes the partial body.
async fn stage_file_field(
    mut field: Field<'_>,
    staging_directory: &FilePath,
) -> Result<StagedFile, ApiError> {
    let mut staged_file =
        StagedFile::new(staging_directory.join(uuid::Uuid::new_v4().to_string()));
    let mut file = tokio::fs::File::create(staged_file.path())
        .await
        .map_err(staging_failed)?;

    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await.map_err(staging_failed)?;
        staged_file.record_written(chunk.len());
    }
    file.flush().await.map_err(staging_failed)?;

    log::debug!(
        "{} staged {} bytes at {:?}",
        LOG_TAG_UPLOAD,
        staged_file.size(),
        staged_file.path()
    );
    Ok(staged_file)
}

fn staging_failed(error: std::io::Error) -> ApiError {
    log::error!("{} failed to stage upload: {}", LOG_TAG_UPLOAD, error);
    ApiError::UploadFailed
}
