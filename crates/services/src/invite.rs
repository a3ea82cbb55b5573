use std::sync::Arc;

use bson::oid::ObjectId;
use reelhub_db::models::{Invite, Member, User, Workspace};
use thiserror::Error;
use tracing::{info, warn};

use crate::dao::{
    base::DaoError, invite::InviteDao, notification::NotificationDao, user::UserDao,
    workspace::WorkspaceDao,
};
use crate::mail::{self, Mailer, OutgoingMail};

#[derive(Debug, Error)]
pub enum InviteError {
    #[error("Workspace not found")]
    WorkspaceNotFound,
    #[error("User not found")]
    ReceiverNotFound,
    #[error("You cannot invite members to this workspace")]
    NotAllowed,
    #[error("Invitation not found")]
    NotFound,
    #[error("You are not authorized to accept this invite")]
    Unauthorized,
    #[error("This invitation has already been accepted")]
    AlreadyAccepted,
    #[error("Oops! something went wrong")]
    InviteFailed(#[source] DaoError),
    #[error("Failed to accept the invitation")]
    AcceptFailed(#[source] DaoError),
}

/// Workspace invitation life cycle: `invite` creates a pending invite and
/// tells the receiver, `accept` turns it into a membership.
pub struct InviteService {
    users: Arc<UserDao>,
    workspaces: Arc<WorkspaceDao>,
    invites: Arc<InviteDao>,
    notifications: Arc<NotificationDao>,
    mailer: Arc<dyn Mailer>,
    public_url: String,
}

impl InviteService {
    pub fn new(
        users: Arc<UserDao>,
        workspaces: Arc<WorkspaceDao>,
        invites: Arc<InviteDao>,
        notifications: Arc<NotificationDao>,
        mailer: Arc<dyn Mailer>,
        public_url: String,
    ) -> Self {
        Self {
            users,
            workspaces,
            invites,
            notifications,
            mailer,
            public_url,
        }
    }

    /// Invites `receiver_id` into `workspace_id` on behalf of `sender`.
    ///
    /// The invite insert, the sender notification and the mail are separate
    /// steps: once the invite is stored it stays usable even if the later
    /// steps fail.
    pub async fn invite(
        &self,
        sender: &User,
        workspace_id: ObjectId,
        receiver_id: ObjectId,
        receiver_email: &str,
    ) -> Result<Invite, InviteError> {
        let sender_id = sender.id.ok_or(InviteError::InviteFailed(DaoError::NotFound))?;

        let workspace = match self.workspaces.find_accessible(workspace_id, sender_id).await {
            Ok(workspace) => workspace,
            Err(DaoError::NotFound) => return Err(InviteError::WorkspaceNotFound),
            Err(DaoError::Forbidden(_)) => return Err(InviteError::NotAllowed),
            Err(e) => return Err(InviteError::InviteFailed(e)),
        };

        let receiver = match self.users.base.find_by_id(receiver_id).await {
            Ok(receiver) => receiver,
            Err(DaoError::NotFound) => return Err(InviteError::ReceiverNotFound),
            Err(e) => return Err(InviteError::InviteFailed(e)),
        };

        let invite = self
            .invites
            .create(sender_id, receiver_id, workspace_id, invite_content(&workspace))
            .await
            .map_err(InviteError::InviteFailed)?;
        let invite_id = invite.id.ok_or(InviteError::InviteFailed(DaoError::NotFound))?;

        info!(%invite_id, %workspace_id, %receiver_id, "Invite created");

        if let Err(e) = self
            .notifications
            .create(sender_id, sender_notification(sender, &receiver, &workspace))
            .await
        {
            warn!(%invite_id, error = %e, "Failed to notify sender about invite");
        }

        let link = invite_link(&self.public_url, invite_id);
        mail::dispatch(
            self.mailer.clone(),
            invitation_mail(receiver_email, sender, &workspace, &link),
        );

        Ok(invite)
    }

    /// Accepts `invite_id` as `caller`. Only the receiver may accept, and
    /// only once.
    pub async fn accept(&self, caller: &User, invite_id: ObjectId) -> Result<Member, InviteError> {
        let invite = match self.invites.base.find_by_id(invite_id).await {
            Ok(invite) => invite,
            Err(DaoError::NotFound) => return Err(InviteError::NotFound),
            Err(e) => return Err(InviteError::AcceptFailed(e)),
        };

        // Receiver check first so non-recipients learn nothing about the state.
        if caller.id != Some(invite.receiver_id) {
            return Err(InviteError::Unauthorized);
        }

        if invite.accepted {
            return Err(InviteError::AlreadyAccepted);
        }

        let member = self.invites.accept(&invite).await.map_err(|e| match e {
            DaoError::Conflict(_) => InviteError::AlreadyAccepted,
            other => InviteError::AcceptFailed(other),
        })?;

        info!(
            %invite_id,
            workspace_id = %invite.workspace_id,
            user_id = %invite.receiver_id,
            "Invite accepted, membership created"
        );
        Ok(member)
    }
}

fn invite_content(workspace: &Workspace) -> String {
    format!(
        "You are invited to join {} Workspace, click accept to confirm",
        workspace.name
    )
}

fn sender_notification(sender: &User, receiver: &User, workspace: &Workspace) -> String {
    format!(
        "{} invited {} into {}",
        sender.full_name(),
        receiver.full_name(),
        workspace.name
    )
}

pub fn invite_link(public_url: &str, invite_id: ObjectId) -> String {
    format!("{}/invite/{}", public_url.trim_end_matches('/'), invite_id.to_hex())
}

fn invitation_mail(to: &str, sender: &User, workspace: &Workspace, link: &str) -> OutgoingMail {
    OutgoingMail {
        to: to.to_string(),
        subject: "You got an invitation".to_string(),
        text: format!(
            "{} invited you to join {} on reelhub.\n\nAccept the invitation: {}\n",
            sender.full_name(),
            workspace.name,
            link
        ),
        html: Some(format!(
            "<p>{} invited you to join <strong>{}</strong> on reelhub.</p>\
             <p><a href=\"{}\">Accept Invite</a></p>",
            sender.full_name(),
            workspace.name,
            link
        )),
    }
}
