mod common;

use common::TestApp;
use common::POLKA_KEY;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn data(response: reqwest::Response) -> Value {
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

#[tokio::test]
async fn test_chirp_crud() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;

    let chirp = app.post_chirp(&alice.token, "hello world").await;
    assert_eq!(chirp["body"], "hello world");
    assert_eq!(chirp["user_id"], alice.user_id.as_str());
    let chirp_id = chirp["id"].as_str().unwrap().to_string();

    let response = app
        .get(&format!("/api/chirps/{}", chirp_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["body"], "hello world");

    let response = app
        .delete_authenticated(&format!("/api/chirps/{}", chirp_id), &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get(&format!("/api/chirps/{}", chirp_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chirp_body_validation() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;

    for body in [String::new(), "x".repeat(141)] {
        let response = app
            .post_authenticated("/api/chirps", &alice.token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    app.post_chirp(&alice.token, &"x".repeat(140)).await;
}

#[tokio::test]
async fn test_list_chirps_filter_and_sort() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let bob = app.signed_up("bob@x.com").await;

    app.post_chirp(&alice.token, "first").await;
    app.post_chirp(&bob.token, "from bob").await;
    app.post_chirp(&alice.token, "second").await;

    let response = app
        .get(&format!("/api/chirps?author_id={}&sort=desc", alice.user_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let chirps = data(response).await;
    let bodies: Vec<&str> = chirps
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["second", "first"]);

    let response = app
        .get("/api/chirps")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await.as_array().unwrap().len(), 3);

    let response = app
        .get(&format!("/api/users/{}/chirps", bob.user_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await.as_array().unwrap().len(), 1);

    let response = app
        .get_authenticated("/api/me/chirps", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await.as_array().unwrap().len(), 2);

    let response = app
        .get("/api/chirps?sort=sideways")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_chirp_of_another_user_is_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let bob = app.signed_up("bob@x.com").await;

    let chirp = app.post_chirp(&alice.token, "mine").await;

    let response = app
        .delete_authenticated(
            &format!("/api/chirps/{}", chirp["id"].as_str().unwrap()),
            &bob.token,
        )
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_editing_requires_paid_tier_and_ownership() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let bob = app.signed_up("bob@x.com").await;

    let chirp = app.post_chirp(&alice.token, "original").await;
    let path = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());

    // Owner without the paid tier
    let response = app
        .patch_authenticated(&path, &alice.token)
        .json(&json!({ "body": "edited" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Paid tier but not the owner
    app.upgrade(&bob.user_id).await;
    let response = app
        .patch_authenticated(&path, &bob.token)
        .json(&json!({ "body": "edited" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Paid owner
    app.upgrade(&alice.user_id).await;
    let response = app
        .patch_authenticated(&path, &alice.token)
        .json(&json!({ "body": "edited" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["body"], "edited");
}

#[tokio::test]
async fn test_webhook_upgrades_membership() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;

    app.upgrade(&alice.user_id).await;

    let response = app
        .get(&format!("/api/users/{}", alice.user_id))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await["is_chirpy_red"], true);
}

#[tokio::test]
async fn test_webhook_rejects_bad_keys() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let payload = json!({ "event": "user.upgraded", "data": { "user_id": alice.user_id } });

    let response = app
        .post("/api/polka/webhooks")
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post("/api/polka/webhooks")
        .header("Authorization", "ApiKey wrong")
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The right key under the wrong scheme
    let response = app
        .post_authenticated("/api/polka/webhooks", POLKA_KEY)
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_ignores_other_events_and_unknown_users() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/polka/webhooks")
        .header("Authorization", format!("ApiKey {}", POLKA_KEY))
        .json(&json!({ "event": "user.payment_failed", "data": { "user_id": "whatever" } }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .post("/api/polka/webhooks")
        .header("Authorization", format!("ApiKey {}", POLKA_KEY))
        .json(&json!({
            "event": "user.upgraded",
            "data": { "user_id": uuid::Uuid::new_v4().to_string() }
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_follow_and_feed() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let bob = app.signed_up("bob@x.com").await;
    let carol = app.signed_up("carol@x.com").await;

    app.post_chirp(&bob.token, "bob one").await;
    app.post_chirp(&carol.token, "carol one").await;
    app.post_chirp(&bob.token, "bob two").await;

    // Following twice is fine
    for _ in 0..2 {
        let response = app
            .post_authenticated("/api/follows", &alice.token)
            .json(&json!({ "user_id": bob.user_id }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .get_authenticated("/api/following", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    let following = data(response).await;
    assert_eq!(following.as_array().unwrap().len(), 1);
    assert_eq!(following[0]["followee_id"], bob.user_id.as_str());

    let response = app
        .get_authenticated("/api/followers", &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await[0]["follower_id"], alice.user_id.as_str());

    let response = app
        .get_authenticated("/api/feed", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let feed = data(response).await;
    let bodies: Vec<&str> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["bob two", "bob one"]);

    let response = app
        .get_authenticated("/api/feed?limit=1&offset=1", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    let page = data(response).await;
    assert_eq!(page.as_array().unwrap().len(), 1);
    assert_eq!(page[0]["body"], "bob one");

    let response = app
        .delete_authenticated(&format!("/api/follows/{}", bob.user_id), &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated("/api/feed", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert!(data(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_follow_rejects_self_and_unknown_users() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;

    let response = app
        .post_authenticated("/api/follows", &alice.token)
        .json(&json!({ "user_id": alice.user_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_authenticated("/api/follows", &alice.token)
        .json(&json!({ "user_id": uuid::Uuid::new_v4().to_string() }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_friendship_flow() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let bob = app.signed_up("bob@x.com").await;

    let response = app
        .post_authenticated("/api/friends/request", &alice.token)
        .json(&json!({ "user_id": bob.user_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(data(response).await["status"], "pending");

    // A second request in either direction conflicts
    let response = app
        .post_authenticated("/api/friends/request", &bob.token)
        .json(&json!({ "user_id": alice.user_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .get_authenticated("/api/friends/sent", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await.as_array().unwrap().len(), 1);

    let response = app
        .get_authenticated("/api/friends/requests", &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(data(response).await[0]["requester_id"], alice.user_id.as_str());

    // The requester cannot accept on the addressee's behalf
    let response = app
        .post_authenticated(&format!("/api/friends/{}/accept", bob.user_id), &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .post_authenticated(&format!("/api/friends/{}/accept", alice.user_id), &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(data(response).await["status"], "accepted");

    for token in [&alice.token, &bob.token] {
        let response = app
            .get_authenticated("/api/friends", token)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(data(response).await.as_array().unwrap().len(), 1);
    }

    let response = app
        .delete_authenticated(&format!("/api/friends/{}", alice.user_id), &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated("/api/friends", &alice.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert!(data(response).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_friend_request() {
    let app = TestApp::spawn().await;
    let alice = app.signed_up("alice@x.com").await;
    let bob = app.signed_up("bob@x.com").await;

    app.post_authenticated("/api/friends/request", &alice.token)
        .json(&json!({ "user_id": bob.user_id }))
        .send()
        .await
        .expect("Failed to execute request");

    let path = format!("/api/friends/{}/reject", alice.user_id);
    let response = app
        .post_authenticated(&path, &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .post_authenticated(&path, &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_authenticated(&format!("/api/friends/{}/reject", bob.user_id), &bob.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
