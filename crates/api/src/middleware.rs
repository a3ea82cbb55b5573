use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::{extractors::auth::session_token, state::AppState};

/// Sends requests under a protected prefix to the provider's sign-in page
/// unless they carry a valid session. Everything else passes through.
pub async fn require_session(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let identity = &state.settings.identity;
    let path = req.uri().path();

    if is_protected(path, &identity.protected_prefixes) {
        let signed_in = session_token(req.headers())
            .is_some_and(|token| state.auth.verify_session_token(&token).is_ok());

        if !signed_in {
            let path_and_query = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(path);
            let return_to = format!(
                "{}{}",
                state.settings.app.public_url.trim_end_matches('/'),
                path_and_query
            );
            debug!(path, "Redirecting unauthenticated request to sign-in");
            return Redirect::temporary(&sign_in_redirect(&identity.sign_in_url, &return_to))
                .into_response();
        }
    }

    next.run(req).await
}

fn is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

pub(crate) fn sign_in_redirect(sign_in_url: &str, return_to: &str) -> String {
    let separator = if sign_in_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}redirect_url={}",
        sign_in_url,
        separator,
        urlencoding::encode(return_to)
    )
}
