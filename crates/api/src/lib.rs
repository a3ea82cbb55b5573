pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use response::ActionResponse;
use state::AppState;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let auth_routes = Router::new().route("/callback", post(routes::auth::callback));

    let user_routes = Router::new()
        .route("/profile", get(routes::user::profile))
        .route("/notifications", get(routes::user::notifications))
        .route("/search", get(routes::user::search))
        .route(
            "/first-view",
            get(routes::user::first_view).put(routes::user::set_first_view),
        );

    let workspace_routes = Router::new()
        .route(
            "/",
            get(routes::workspace::list).post(routes::workspace::create),
        )
        .route("/{workspace_id}/access", get(routes::workspace::verify_access))
        .route(
            "/{workspace_id}/folder",
            get(routes::folder::list).post(routes::folder::create),
        )
        .route(
            "/{workspace_id}/video",
            get(routes::video::list).post(routes::video::create),
        )
        .route("/{workspace_id}/invite", post(routes::invite::invite));

    let folder_routes = Router::new().route(
        "/{folder_id}",
        get(routes::folder::info).put(routes::folder::rename),
    );

    let video_routes = Router::new()
        .route("/{video_id}/location", put(routes::video::move_location))
        .route(
            "/{video_id}/comment",
            get(routes::comment::thread).post(routes::comment::create),
        );

    let invite_routes =
        Router::new().route("/{invite_id}/accept", post(routes::invite::accept));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/user", user_routes)
        .nest("/workspace", workspace_routes)
        .nest("/folder", folder_routes)
        .nest("/video", video_routes)
        .nest("/invite", invite_routes);

    Router::new()
        .nest("/api", api)
        .route("/invite/{invite_id}", get(routes::invite::accept_link))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), middleware::require_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health_check(State(state): State<AppState>) -> ActionResponse<Health> {
    match state.db.run_command(bson::doc! { "ping": 1 }).await {
        Ok(_) => ActionResponse::ok(Health {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
        Err(e) => {
            error!(error = %e, "Health check failed");
            ActionResponse::new(StatusCode::INTERNAL_SERVER_ERROR, None)
                .with_message("Database unavailable")
        }
    }
}

async fn not_found() -> ActionResponse<()> {
    ActionResponse::message_only(StatusCode::NOT_FOUND, "Not found")
}
