use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use bson::oid::ObjectId;
use reelhub_db::models::{Invite, Member};
use reelhub_services::InviteError;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use super::{hex, parse_object_id};
use crate::{
    error::ApiError,
    extractors::{auth::CurrentUser, body::ApiJson},
    middleware::sign_in_redirect,
    response::ActionResponse,
    state::AppState,
};

/// Where the browser lands after accepting through the emailed link.
const AFTER_ACCEPT_PATH: &str = "/dashboard";

#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    pub receiver_id: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub id: String,
    pub workspace_id: String,
    pub receiver_id: String,
    pub accepted: bool,
}

impl From<Invite> for InviteResponse {
    fn from(i: Invite) -> Self {
        Self {
            id: hex(i.id),
            workspace_id: i.workspace_id.to_hex(),
            receiver_id: i.receiver_id.to_hex(),
            accepted: i.accepted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: String,
    pub workspace_id: String,
    pub user_id: String,
}

impl From<Member> for MembershipResponse {
    fn from(m: Member) -> Self {
        Self {
            id: hex(m.id),
            workspace_id: m.workspace_id.to_hex(),
            user_id: m.user_id.to_hex(),
        }
    }
}

pub async fn invite(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(workspace_id): Path<String>,
    ApiJson(body): ApiJson<InviteRequest>,
) -> Result<ActionResponse<InviteResponse>, ApiError> {
    body.validate()?;
    let wid = parse_object_id(&workspace_id, "workspace_id")?;
    let receiver_id = parse_object_id(&body.receiver_id, "receiver_id")?;

    let invite = state
        .invites
        .invite(&auth.user, wid, receiver_id, &body.email)
        .await?;

    Ok(ActionResponse::ok(InviteResponse::from(invite)).with_message("Invite sent"))
}

pub async fn accept(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(invite_id): Path<String>,
) -> Result<ActionResponse<MembershipResponse>, ApiError> {
    let iid = invite_object_id(&invite_id)?;

    let member = state.invites.accept(&auth.user, iid).await?;

    Ok(ActionResponse::ok(MembershipResponse::from(member)).with_message("Invitation accepted"))
}

/// Target of the emailed invitation link. Browsers without a session are
/// sent to sign-in and come back here afterwards.
pub async fn accept_link(
    State(state): State<AppState>,
    auth: Result<CurrentUser, ApiError>,
    Path(invite_id): Path<String>,
) -> Response {
    let auth = match auth {
        Ok(auth) => auth,
        Err(ApiError::Unauthenticated(_)) => {
            let return_to = format!(
                "{}/invite/{}",
                state.settings.app.public_url.trim_end_matches('/'),
                invite_id
            );
            debug!(%invite_id, "Invite link opened without a session");
            return Redirect::temporary(&sign_in_redirect(
                &state.settings.identity.sign_in_url,
                &return_to,
            ))
            .into_response();
        }
        Err(e) => return e.into_response(),
    };

    let iid = match invite_object_id(&invite_id) {
        Ok(iid) => iid,
        Err(e) => return e.into_response(),
    };

    match state.invites.accept(&auth.user, iid).await {
        Ok(_) => Redirect::temporary(AFTER_ACCEPT_PATH).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Ids from an invitation link that cannot name a stored invite.
fn invite_object_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| InviteError::NotFound.into())
}
