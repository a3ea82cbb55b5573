use crate::fixtures::test_app::TestApp;
use bson::oid::ObjectId;
use serde_json::Value;

async fn thread(app: &TestApp, target_id: &str) -> (u16, Value) {
    let resp = app
        .client
        .get(app.url(&format!("/api/video/{}/comment", target_id)))
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn thread_nests_replies_under_root() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "V1").await;

    let c1 = app.seed_comment(&user, &video, "C1", None).await;
    let r1 = app.seed_comment(&user, &video, "R1", Some(&c1)).await;
    let r2 = app.seed_comment(&user, &video, "R2", Some(&c1)).await;

    let (status, json) = thread(&app, &video).await;

    assert_eq!(status, 200);
    let roots = json["data"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["id"], c1);
    assert_eq!(roots[0]["comment"], "C1");
    let reply_ids: Vec<&str> = roots[0]["replies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(reply_ids, vec![r1.as_str(), r2.as_str()]);
    assert_eq!(roots[0]["replies"][0]["parent_id"], c1);
}

#[tokio::test]
async fn thread_of_a_reply_is_empty() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "V1").await;
    let c1 = app.seed_comment(&user, &video, "C1", None).await;
    let r1 = app.seed_comment(&user, &video, "R1", Some(&c1)).await;

    let (status, json) = thread(&app, &r1).await;

    assert_eq!(status, 200);
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn thread_orders_roots_and_attaches_authors() {
    let app = TestApp::spawn().await;
    let owner = app.sign_in("Ada", "Lovelace").await;
    let seeded_video = app.seed_video(&owner, &owner.workspace_id, None, "Demo").await;
    let other = app.sign_in("Grace", "Hopper").await;

    app.seed_comment(&owner, &seeded_video, "first", None).await;
    app.seed_comment(&other, &seeded_video, "second", None).await;

    let (_, json) = thread(&app, &seeded_video).await;

    let roots = json["data"].as_array().unwrap();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["comment"], "first");
    assert_eq!(roots[0]["author"]["first_name"], "Ada");
    assert_eq!(roots[1]["comment"], "second");
    assert_eq!(roots[1]["author"]["first_name"], "Grace");
    assert_eq!(roots[1]["replies"], serde_json::json!([]));
}

#[tokio::test]
async fn reply_to_a_reply_is_rejected() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "V1").await;
    let c1 = app.seed_comment(&user, &video, "C1", None).await;
    let r1 = app.seed_comment(&user, &video, "R1", Some(&c1)).await;

    let resp = app
        .auth_post(&format!("/api/video/{}/comment", video), &user.token)
        .json(&serde_json::json!({ "comment": "too deep", "parent_id": r1 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Replies cannot have replies");
}

#[tokio::test]
async fn reply_across_videos_is_rejected() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let v1 = app.seed_video(&user, &user.workspace_id, None, "V1").await;
    let v2 = app.seed_video(&user, &user.workspace_id, None, "V2").await;
    let c1 = app.seed_comment(&user, &v1, "C1", None).await;

    let resp = app
        .auth_post(&format!("/api/video/{}/comment", v2), &user.token)
        .json(&serde_json::json!({ "comment": "wrong place", "parent_id": c1 }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn comment_on_unknown_video_is_404() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;

    let resp = app
        .auth_post(&format!("/api/video/{}/comment", ObjectId::new().to_hex()), &user.token)
        .json(&serde_json::json!({ "comment": "hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn empty_comment_is_rejected() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "V1").await;

    let resp = app
        .auth_post(&format!("/api/video/{}/comment", video), &user.token)
        .json(&serde_json::json!({ "comment": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["message"], "Comment cannot be empty");
}

#[tokio::test]
async fn commenting_requires_session() {
    let app = TestApp::spawn().await;
    let user = app.sign_in("Ada", "Lovelace").await;
    let video = app.seed_video(&user, &user.workspace_id, None, "V1").await;

    let resp = app
        .client
        .post(app.url(&format!("/api/video/{}/comment", video)))
        .json(&serde_json::json!({ "comment": "anonymous" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 403);
}
