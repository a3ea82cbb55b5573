use crate::fixtures::test_app::TestApp;
use bson::oid::ObjectId;
use serde_json::Value;

async fn list(app: &TestApp, token: &str, container_id: &str) -> (u16, Value) {
    let resp = app
        .auth_get(&format!("/api/workspace/{}/video", container_id), token)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn create_registers_processing_video() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;

    let resp = app
        .auth_post(&format!("/api/workspace/{}/video", user.workspace_id), &user.token)
        .json(&serde_json::json!({ "title": "Standup", "source": "standup.webm" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["title"], "Standup");
    assert_eq!(json["data"]["source"], "standup.webm");
    assert_eq!(json["data"]["processing"], true);
    assert_eq!(json["data"]["views"], 0);
    assert!(json["data"]["folder_id"].is_null());
}

#[tokio::test]
async fn create_without_source_is_400() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;

    let resp = app
        .auth_post(&format!("/api/workspace/{}/video", user.workspace_id), &user.token)
        .json(&serde_json::json!({ "title": "Nothing", "source": "" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Video source is required");
}

#[tokio::test]
async fn list_by_workspace_is_oldest_first_with_author() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    app.seed_video(&user, &user.workspace_id, None, "first").await;
    app.seed_video(&user, &user.workspace_id, None, "second").await;

    let (status, json) = list(&app, &user.token, &user.workspace_id).await;

    assert_eq!(status, 200);
    let videos = json["data"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "first");
    assert_eq!(videos[1]["title"], "second");
    assert_eq!(videos[0]["author"]["first_name"], "Ada");
    assert!(videos[0].get("folder").is_none());
}

#[tokio::test]
async fn list_by_folder_includes_folder_summary() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let folder = app.seed_folder(&user, &user.workspace_id, "Demos").await;
    app.seed_video(&user, &user.workspace_id, Some(&folder), "in folder").await;

    let (status, json) = list(&app, &user.token, &folder).await;

    assert_eq!(status, 200);
    let videos = json["data"].as_array().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["folder"]["id"], folder);
    assert_eq!(videos[0]["folder"]["name"], "Demos");
}

#[tokio::test]
async fn workspace_list_hydrates_each_folder_and_author() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_invite().await;
    let accepted = app.accept(&seeded.receiver, &seeded.invite_id).await;
    assert_eq!(accepted.status().as_u16(), 200);
    let owner = &seeded.owner;
    let member = &seeded.receiver;
    let drafts = app.seed_folder(owner, &seeded.workspace_id, "Drafts").await;
    let final_cut = app.seed_folder(owner, &seeded.workspace_id, "Final").await;
    app.seed_video(owner, &seeded.workspace_id, Some(&drafts), "a").await;
    app.seed_video(member, &seeded.workspace_id, Some(&final_cut), "b").await;
    app.seed_video(owner, &seeded.workspace_id, Some(&drafts), "c").await;
    app.seed_video(member, &seeded.workspace_id, None, "d").await;

    let (status, json) = list(&app, &owner.token, &seeded.workspace_id).await;

    assert_eq!(status, 200);
    let videos = json["data"].as_array().unwrap();
    let titles: Vec<&str> = videos.iter().map(|v| v["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["a", "b", "c", "d"]);
    assert_eq!(videos[0]["folder"]["name"], "Drafts");
    assert_eq!(videos[1]["folder"]["name"], "Final");
    assert_eq!(videos[2]["folder"]["id"], drafts);
    assert!(videos[3].get("folder").is_none());
    assert_eq!(videos[0]["author"]["id"], owner.id);
    assert_eq!(videos[1]["author"]["first_name"], "Grace");
    assert_eq!(videos[3]["author"]["id"], member.id);
}

#[tokio::test]
async fn empty_list_is_404() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;

    let (status, json) = list(&app, &user.token, &user.workspace_id).await;

    assert_eq!(status, 404);
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn list_of_unknown_container_is_404() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;

    let (status, _) = list(&app, &user.token, &ObjectId::new().to_hex()).await;

    assert_eq!(status, 404);
}

#[tokio::test]
async fn stranger_cannot_list_videos() {
    let app = TestApp::spawn().await;
    let owner = app.sign_in("Ada", "Lovelace").await;
    let stranger = app.sign_in("Mallory", "Evil").await;
    app.seed_video(&owner, &owner.workspace_id, None, "secret").await;

    let (status, _) = list(&app, &stranger.token, &owner.workspace_id).await;

    assert_eq!(status, 401);
}

#[tokio::test]
async fn move_into_folder_and_back_to_root() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let folder = app.seed_folder(&user, &user.workspace_id, "Archive").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "clip").await;

    let resp = app
        .auth_put(&format!("/api/video/{}/location", video), &user.token)
        .json(&serde_json::json!({ "workspace_id": user.workspace_id, "folder_id": folder }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["folder_id"], folder);

    let (_, in_folder) = list(&app, &user.token, &folder).await;
    assert_eq!(in_folder["data"].as_array().unwrap().len(), 1);

    let resp = app
        .auth_put(&format!("/api/video/{}/location", video), &user.token)
        .json(&serde_json::json!({ "workspace_id": user.workspace_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert!(json["data"]["folder_id"].is_null());

    let (status, _) = list(&app, &user.token, &folder).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn move_by_non_owner_is_401() {
    let app = TestApp::spawn().await;
    let seeded = app.seed_invite().await;
    let accepted = app.accept(&seeded.receiver, &seeded.invite_id).await;
    assert_eq!(accepted.status().as_u16(), 200);
    let video = app
        .seed_video(&seeded.owner, &seeded.workspace_id, None, "owner's")
        .await;

    // A member can see the workspace but does not own the video.
    let resp = app
        .auth_put(&format!("/api/video/{}/location", video), &seeded.receiver.token)
        .json(&serde_json::json!({ "workspace_id": seeded.workspace_id }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn move_into_folder_of_other_workspace_is_400() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let other: Value = app
        .auth_post("/api/workspace", &user.token)
        .json(&serde_json::json!({ "name": "Other" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let other_id = other["data"]["id"].as_str().unwrap().to_string();
    let foreign_folder = app.seed_folder(&user, &other_id, "Elsewhere").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "clip").await;

    let resp = app
        .auth_put(&format!("/api/video/{}/location", video), &user.token)
        .json(&serde_json::json!({
            "workspace_id": user.workspace_id,
            "folder_id": foreign_folder,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Folder belongs to another workspace");
}
