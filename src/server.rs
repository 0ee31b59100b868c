//! Front-end / HTTP surface (spec.md §6.6).
//!
//! A thin request/response layer: `GET /status` and `POST /convert`
//! (multipart upload). Grounded on `bench_server.rs`'s axum bind/serve
//! shape and `CorsLayer::permissive()` usage — the only other
//! long-running network server the teacher ships.

use crate::archive::extract_images;
use crate::config::ServerConfig;
use crate::domain::{BrushInput, PackageOptions, PackageRequest};
use crate::error::ForgeError;
use crate::normalize::{normalize_image, MAX_DIMENSION};
use crate::sut::SutBuilder;
use axum::extract::Multipart;
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

const MAX_BRUSH_NAME_LEN: usize = 100;

pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/convert", post(convert_handler))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
}

pub async fn serve(config: ServerConfig) {
    let addr = config.bind_addr.clone();
    let app = router(&config);
    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            tracing::info!("sut-forge listening on {addr}");
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("server error: {e}");
            }
        }
        Err(e) => tracing::error!("failed to bind {addr}: {e}"),
    }
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    csp_compatible: bool,
    version: &'static str,
    capabilities: Vec<&'static str>,
    max_file_size: usize,
    max_image_size: u32,
}

async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "available",
        csp_compatible: true,
        version: env!("CARGO_PKG_VERSION"),
        capabilities: vec!["png", "jpeg", "zip", "brushset"],
        max_file_size: ServerConfig::default().max_upload_bytes,
        max_image_size: MAX_DIMENSION,
    })
}

async fn convert_handler(mut multipart: Multipart) -> Response {
    let mut package_name = "CSP Brushes".to_string();
    let mut author_name = "Unknown".to_string();
    let mut options = PackageOptions::default();
    let mut brushes: Vec<BrushInput> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
        };

        match field.name().unwrap_or("").to_string().as_str() {
            "package_name" => {
                if let Ok(text) = field.text().await {
                    package_name = text;
                }
            }
            "author_name" => {
                if let Ok(text) = field.text().await {
                    author_name = text;
                }
            }
            "settings" => {
                if let Ok(text) = field.text().await {
                    if let Ok(parsed) = serde_json::from_str::<PackageOptions>(&text) {
                        options = parsed;
                    }
                }
            }
            "files[]" | "files" => {
                let filename = field.file_name().unwrap_or("brush").to_string();
                match field.bytes().await {
                    Ok(data) => ingest_upload(&filename, &data, &mut brushes),
                    Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
                }
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    if brushes.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "no valid brush files were processed",
        );
    }

    let brush_count = brushes.len();
    let request = PackageRequest {
        package_name,
        author_name,
        options,
        brushes,
    };

    match SutBuilder::new().build(&request) {
        Ok(bytes) => emit_sut_response(&request.package_name, brush_count, bytes),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn emit_sut_response(package_name: &str, brush_count: usize, bytes: Vec<u8>) -> Response {
    let filename = format!("{}.sut", sanitize_filename(package_name));

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        "application/octet-stream".parse().unwrap(),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\"").parse().unwrap(),
    );
    headers.insert(
        HeaderName::from_static("x-brush-count"),
        brush_count.to_string().parse().unwrap(),
    );

    (StatusCode::OK, headers, bytes).into_response()
}

/// Routes an uploaded field either straight into the normalizer (loose
/// image) or through the archive demultiplexer first (`.zip`/`.brushset`).
fn ingest_upload(filename: &str, data: &[u8], brushes: &mut Vec<BrushInput>) {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".zip") || lower.ends_with(".brushset") {
        match extract_images(data) {
            Ok(entries) => {
                for entry in entries {
                    push_normalized(&entry.stem, &entry.bytes, brushes);
                }
            }
            Err(e) => tracing::warn!("skipping unreadable archive {filename}: {e}"),
        }
    } else if lower.ends_with(".png") || lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        let stem = std::path::Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        push_normalized(stem, data, brushes);
    } else {
        tracing::warn!("skipping unsupported upload {filename}");
    }
}

fn push_normalized(name: &str, data: &[u8], brushes: &mut Vec<BrushInput>) {
    match normalize_image(data) {
        Ok(normalized) => brushes.push(BrushInput::new(
            truncate_brush_name(name),
            normalized.width,
            normalized.height,
            normalized.png,
        )),
        Err(ForgeError::Normalize(reason)) => {
            tracing::warn!("skipping image {name}: {reason}")
        }
        Err(e) => tracing::warn!("skipping image {name}: {e}"),
    }
}

/// Truncates at the input boundary (spec.md §4.9 tie-breaks) — the only
/// other truncation point is the download filename, handled separately
/// in [`sanitize_filename`].
fn truncate_brush_name(name: &str) -> String {
    name.chars().take(MAX_BRUSH_NAME_LEN).collect()
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "brushes".to_string()
    } else {
        cleaned
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}
