//! Endpoint handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use log::{debug, info};

use super::error::ApiError;
use super::models::{
    GlitchImageRequest, GlitchRequest, GlitchResponse, ImageResponse, WelcomeResponse,
};
use super::AppState;
use crate::glitch::{glitch_preview_with_limit, glitch_text};
use crate::layout::render_data_uri;

pub const WELCOME_MESSAGE: &str = "Welcome to Glitchy Text Generator API";

/// `GET /`
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse { message: WELCOME_MESSAGE.to_string() })
}

/// `POST /glitch`
pub async fn glitch(
    State(state): State<AppState>,
    payload: Result<Json<GlitchRequest>, JsonRejection>,
) -> Result<Json<GlitchResponse>, ApiError> {
    let Json(body) = payload?;
    body.validate(state.config.limits.max_text_chars)?;

    let glitched_text = glitch_text(&body.text, &body.style, &mut rand::rng());
    Ok(Json(GlitchResponse { glitched_text }))
}

/// `POST /glitch/preview`
pub async fn glitch_preview(
    State(state): State<AppState>,
    payload: Result<Json<GlitchRequest>, JsonRejection>,
) -> Result<Json<GlitchResponse>, ApiError> {
    let Json(body) = payload?;
    body.validate(state.config.limits.max_text_chars)?;
    debug!("preview: text={:?}, style={}, font={}", body.text, body.style, body.font);

    let glitched_text = glitch_preview_with_limit(
        &body.text,
        &body.style,
        state.config.limits.preview_chars,
        &mut rand::rng(),
    );
    Ok(Json(GlitchResponse { glitched_text }))
}

/// `POST /glitch/image`
///
/// Rendering is CPU-bound, so it runs on the blocking pool.
pub async fn glitch_image(
    State(state): State<AppState>,
    payload: Result<Json<GlitchImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let Json(body) = payload?;
    body.validate(state.config.limits.max_render_chars)?;
    info!("rendering {} chars with font '{}'", body.glitched_text.chars().count(), body.font);

    let fonts = state.fonts.clone();
    let options = state.layout;
    let image_base64 = tokio::task::spawn_blocking(move || {
        render_data_uri(&fonts, &body.glitched_text, &body.font, &options)
    })
    .await??;

    Ok(Json(ImageResponse { image_base64 }))
}
