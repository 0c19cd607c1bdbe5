use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::state::AppState;
use crate::views;

/// Header htmx sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// An HTML fragment produced by a page component. Responses built from a
/// fragment get the layout applied by [`apply_layout`] unless the request
/// is partial.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment(String);

impl Fragment {
    pub fn new(html: impl Into<String>) -> Self {
        Fragment(html.into())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct FragmentMarker;

impl IntoResponse for Fragment {
    fn into_response(self) -> Response {
        let mut response = Html(self.0).into_response();
        response.extensions_mut().insert(FragmentMarker);
        response
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Full,
    Partial,
}

impl RenderMode {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(HX_REQUEST) {
            Some(value) if value.as_bytes() == b"true" => RenderMode::Partial,
            _ => RenderMode::Full,
        }
    }
}

/// Wraps fragment responses in the page layout for full-page requests.
/// Anything that is not a fragment (static files, websocket upgrades)
/// passes through untouched.
pub async fn apply_layout(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mode = RenderMode::from_headers(request.headers());
    let mut response = next.run(request).await;

    if response.extensions().get::<FragmentMarker>().is_none() {
        return response;
    }
    response
        .headers_mut()
        .insert(header::VARY, HeaderValue::from_static("HX-Request"));
    if mode == RenderMode::Partial {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let fragment = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Failed to buffer fragment: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let page = views::index(&String::from_utf8_lossy(&fragment), state.is_development);
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(page))
}
