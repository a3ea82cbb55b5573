use bson::{doc, oid::ObjectId, DateTime};
use mongodb::{Client, ClientSession, Database};
use reelhub_db::models::{Invite, Member};
use tracing::{debug, warn};

use super::base::{BaseDao, DaoError, DaoResult};

pub struct InviteDao {
    pub base: BaseDao<Invite>,
    pub members: BaseDao<Member>,
    client: Client,
}

impl InviteDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Invite::COLLECTION),
            members: BaseDao::new(db, Member::COLLECTION),
            client: db.client().clone(),
        }
    }

    pub async fn create(
        &self,
        sender_id: ObjectId,
        receiver_id: ObjectId,
        workspace_id: ObjectId,
        content: String,
    ) -> DaoResult<Invite> {
        let now = DateTime::now();
        let invite = Invite {
            id: None,
            sender_id,
            receiver_id,
            workspace_id,
            content,
            accepted: false,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&invite).await?;
        self.base.find_by_id(id).await
    }

    /// Marks the invite accepted and inserts the receiver's membership in one
    /// transaction. Neither write is visible unless both succeed.
    ///
    /// Fails with [`DaoError::Conflict`] when another request accepted the
    /// invite first, and with [`DaoError::DuplicateKey`] when the receiver
    /// already belongs to the workspace.
    pub async fn accept(&self, invite: &Invite) -> DaoResult<Member> {
        let invite_id = invite.id.ok_or(DaoError::NotFound)?;

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        match self
            .accept_in_session(&mut session, invite_id, invite.receiver_id, invite.workspace_id)
            .await
        {
            Ok(member) => {
                session.commit_transaction().await?;
                debug!(%invite_id, "Invite accepted");
                Ok(member)
            }
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(%invite_id, error = %abort_err, "Failed to abort invite transaction");
                }
                Err(e)
            }
        }
    }

    async fn accept_in_session(
        &self,
        session: &mut ClientSession,
        invite_id: ObjectId,
        receiver_id: ObjectId,
        workspace_id: ObjectId,
    ) -> DaoResult<Member> {
        let now = DateTime::now();

        // Conditional on `accepted: false` so concurrent accepts cannot both pass.
        let result = self
            .base
            .collection()
            .update_one(
                doc! { "_id": invite_id, "accepted": false },
                doc! { "$set": { "accepted": true, "updated_at": now } },
            )
            .session(&mut *session)
            .await?;

        if result.matched_count == 0 {
            return Err(DaoError::Conflict(
                "This invitation has already been accepted".to_string(),
            ));
        }

        let member = Member {
            id: None,
            workspace_id,
            user_id: receiver_id,
            created_at: now,
        };
        let id = self.members.insert_one_in(session, &member).await?;

        Ok(Member {
            id: Some(id),
            ..member
        })
    }
}
