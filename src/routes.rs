use std::{io::ErrorKind, path::Path as FsPath, sync::Arc};

use axum::{
    extract::{rejection::FormRejection, Path, State},
    middleware,
    routing::{get, get_service, post},
    Form, Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, warn};

use crate::content_loader::PostError;
use crate::error::AppError;
use crate::hot_reload::ws_handler;
use crate::markdown::render_markdown_to_html;
use crate::models::ContactMessage;
use crate::render::{apply_layout, Fragment};
use crate::state::{AppState, RefreshBroadcaster, RouterState};
use crate::views;

pub fn router(app_state: Arc<AppState>, broadcaster: RefreshBroadcaster, static_dir: &FsPath) -> Router {
    let mut pages = Router::new()
        .route("/", get(homepage))
        .route("/posts", get(list_posts))
        .route("/posts/{name}", get(render_post))
        .route("/contact", get(contact_page))
        .route("/contact/send", post(send_contact))
        .fallback(not_found);
    if app_state.is_development {
        pages = pages.route("/ws", get(ws_handler));
    }

    pages
        .layer(middleware::from_fn_with_state(app_state.clone(), apply_layout))
        .nest_service("/static", get_service(ServeDir::new(static_dir)))
        .layer(TraceLayer::new_for_http())
        .with_state(RouterState {
            app_state,
            broadcaster,
        })
}

async fn homepage() -> Fragment {
    views::home()
}

async fn list_posts(State(state): State<Arc<AppState>>) -> Result<Fragment, AppError> {
    let posts = state.posts.list().await.map_err(|e| {
        error!("Error reading posts: {}", e);
        AppError::from_internal(e)
    })?;
    Ok(views::post_list(&posts))
}

async fn render_post(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Fragment, AppError> {
    let (meta, body) = match state.posts.load(&name).await {
        Ok(post) => post,
        Err(PostError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
            debug!(name = %name, "post does not exist");
            return Err(AppError::NotFound);
        }
        Err(e) => {
            warn!(name = %name, "Error loading post: {}", e);
            return Err(AppError::NotFound);
        }
    };

    let body_html = render_markdown_to_html(&body);
    debug!(name = %name, title = %meta.title, "rendering post");
    Ok(views::post_content(&meta, &body_html))
}

async fn contact_page(State(state): State<Arc<AppState>>) -> Fragment {
    views::contact(state.contact_email.as_deref())
}

async fn send_contact(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ContactMessage>, FormRejection>,
) -> Result<Fragment, AppError> {
    let Form(contact) = form.map_err(|e| {
        warn!("Failed to parse contact form: {}", e);
        AppError::BadRequest("Failed to parse form".to_string())
    })?;

    match state.mailer.deliver(&contact).await {
        Ok(_) => Ok(views::contact_success()),
        Err(e) if e.is_client_error() => Err(AppError::BadRequest(e.to_string())),
        Err(e) => {
            error!("Error sending email: {}", e);
            Err(AppError::from_internal(e))
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound
}
