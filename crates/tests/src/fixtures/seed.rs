use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;

use super::test_app::TestApp;

/// A user signed in through the auth callback, with their personal workspace.
pub struct SeededUser {
    pub id: String,
    pub external_id: String,
    pub email: String,
    pub token: String,
    pub workspace_id: String,
}

impl SeededUser {
    pub fn oid(&self) -> ObjectId {
        ObjectId::parse_str(&self.id).unwrap()
    }
}

/// Owner U1 with workspace W1, an invite I1 from U1 to U2, and an
/// unrelated user U3.
pub struct SeededInvite {
    pub owner: SeededUser,
    pub receiver: SeededUser,
    pub outsider: SeededUser,
    pub workspace_id: String,
    pub invite_id: String,
}

impl TestApp {
    /// Session token as the identity provider would issue it.
    pub fn mint_token(&self, external_id: &str, email: &str, first: &str, last: &str) -> String {
        self.mint_token_with_expiry(external_id, email, first, last, Duration::hours(1))
    }

    pub fn mint_token_with_expiry(
        &self,
        external_id: &str,
        email: &str,
        first: &str,
        last: &str,
        ttl: Duration,
    ) -> String {
        let now = Utc::now();
        let claims = serde_json::json!({
            "sub": external_id,
            "email": email,
            "first_name": first,
            "last_name": last,
            "iat": now.timestamp(),
            "exp": (now + ttl).timestamp(),
            "iss": self.settings.identity.issuer,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.identity.secret.as_bytes()),
        )
        .expect("Failed to mint session token")
    }

    /// Sign a fresh user in and return their ids and token.
    pub async fn sign_in(&self, first: &str, last: &str) -> SeededUser {
        let unique = uuid::Uuid::new_v4().simple().to_string();
        let suffix = &unique[..8];
        let external_id = format!("user_{suffix}");
        let email = format!("{}.{}@reelhub.test", first.to_lowercase(), suffix);
        let token = self.mint_token(&external_id, &email, first, last);

        let resp = self
            .auth_post("/api/auth/callback", &token)
            .send()
            .await
            .expect("Auth callback request failed");

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        assert_eq!(status, 201, "Auth callback failed: {}", body);

        let json: Value = serde_json::from_str(&body).expect("Failed to parse callback response");

        SeededUser {
            id: json["data"]["user"]["id"].as_str().unwrap().to_string(),
            external_id,
            email,
            token,
            workspace_id: json["data"]["workspaces"][0]["id"]
                .as_str()
                .unwrap()
                .to_string(),
        }
    }

    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Send an invite and return the raw response.
    pub async fn invite(
        &self,
        sender: &SeededUser,
        workspace_id: &str,
        receiver: &SeededUser,
    ) -> reqwest::Response {
        self.auth_post(&format!("/api/workspace/{}/invite", workspace_id), &sender.token)
            .json(&serde_json::json!({
                "receiver_id": receiver.id,
                "email": receiver.email,
            }))
            .send()
            .await
            .expect("Invite request failed")
    }

    pub async fn accept(&self, user: &SeededUser, invite_id: &str) -> reqwest::Response {
        self.auth_post(&format!("/api/invite/{}/accept", invite_id), &user.token)
            .send()
            .await
            .expect("Accept request failed")
    }

    pub async fn seed_invite(&self) -> SeededInvite {
        let owner = self.sign_in("Ada", "Lovelace").await;
        let receiver = self.sign_in("Grace", "Hopper").await;
        let outsider = self.sign_in("Alan", "Turing").await;
        let workspace_id = owner.workspace_id.clone();

        let resp = self.invite(&owner, &workspace_id, &receiver).await;
        assert_eq!(resp.status().as_u16(), 200, "Invite failed");
        let json: Value = resp.json().await.unwrap();
        let invite_id = json["data"]["id"].as_str().unwrap().to_string();

        SeededInvite {
            owner,
            receiver,
            outsider,
            workspace_id,
            invite_id,
        }
    }

    /// Create a folder in `workspace_id` and return its id.
    pub async fn seed_folder(&self, user: &SeededUser, workspace_id: &str, name: &str) -> String {
        let resp = self
            .auth_post(&format!("/api/workspace/{}/folder", workspace_id), &user.token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Create folder failed");
        assert_eq!(resp.status().as_u16(), 201);
        let json: Value = resp.json().await.unwrap();
        json["data"]["id"].as_str().unwrap().to_string()
    }

    /// Register a video owned by `user` and return its id.
    pub async fn seed_video(
        &self,
        user: &SeededUser,
        workspace_id: &str,
        folder_id: Option<&str>,
        title: &str,
    ) -> String {
        let resp = self
            .auth_post(&format!("/api/workspace/{}/video", workspace_id), &user.token)
            .json(&serde_json::json!({
                "title": title,
                "source": format!("{}.webm", uuid::Uuid::new_v4().simple()),
                "folder_id": folder_id,
            }))
            .send()
            .await
            .expect("Create video failed");
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        assert_eq!(status, 201, "Create video failed: {}", body);
        let json: Value = serde_json::from_str(&body).unwrap();
        json["data"]["id"].as_str().unwrap().to_string()
    }

    /// Post a comment (or a reply when `parent_id` is set) and return its id.
    pub async fn seed_comment(
        &self,
        user: &SeededUser,
        video_id: &str,
        text: &str,
        parent_id: Option<&str>,
    ) -> String {
        let resp = self
            .auth_post(&format!("/api/video/{}/comment", video_id), &user.token)
            .json(&serde_json::json!({ "comment": text, "parent_id": parent_id }))
            .send()
            .await
            .expect("Create comment failed");
        assert_eq!(resp.status().as_u16(), 201);
        let json: Value = resp.json().await.unwrap();
        json["data"]["id"].as_str().unwrap().to_string()
    }
}
