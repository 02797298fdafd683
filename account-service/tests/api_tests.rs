mod common;

use common::TestApp;
use reqwest::header;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_signup_success() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/signup")
        .json(&json!({
            "name": "ahmed",
            "email": "Ahmed@Gmail.com",
            "password": "Testing",
            "passwordConfirm": "Testing",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert!(body["token"].is_string());
    assert_eq!(body["data"]["user"]["name"], "ahmed");
    assert_eq!(body["data"]["user"]["email"], "ahmed@gmail.com");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let claims = app
        .token_service
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.id, body["data"]["user"]["id"].as_str().unwrap());
}

#[tokio::test]
async fn test_signup_validation_failure() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/signup")
        .json(&json!({
            "name": "ahmed",
            "email": "invalid-email",
            "password": "Testing",
            "passwordConfirm": "Testing1"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Validation failed"));
    assert!(message.contains("email"));
    assert!(message.contains("passwordConfirm"));
}

#[tokio::test]
async fn test_signup_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/signup")
        .header(header::CONTENT_TYPE, "application/json")
        .body(r#"{"name": "ahmed", "email": "#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let app = TestApp::spawn().await;
    app.signup("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .post("/signup")
        .json(&json!({
            "name": "ahmed2",
            "email": "ahmed@gmail.com",
            "password": "Testing",
            "passwordConfirm": "Testing"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("Duplicate"));
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.signup("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .post("/login")
        .json(&json!({"email": "ahmed@gmail.com", "password": "Testing"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
    assert!(body["token"].is_string());
    assert_eq!(body["data"]["user"]["name"], "ahmed");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.signup("ahmed", "ahmed@gmail.com", "Testing").await;

    let wrong_password = app
        .post("/login")
        .json(&json!({"email": "ahmed@gmail.com", "password": "WrongPassword"}))
        .send()
        .await
        .expect("Failed to execute request");
    let unknown_email = app
        .post("/login")
        .json(&json!({"email": "nobody@gmail.com", "password": "Testing"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a: serde_json::Value = wrong_password.json().await.unwrap();
    let b: serde_json::Value = unknown_email.json().await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a["message"], "incorrect email or password");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/login")
        .json(&json!({"email": "ahmed@gmail.com"}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Please provide email and password");
}

#[tokio::test]
async fn test_login_without_body() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/login")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "You are not logged in! Please log in to get access."
    );
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/me", "not-a-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Invalid token. Please log in again!");
}

#[tokio::test]
async fn test_protected_route_with_expired_token() {
    let app = TestApp::spawn().await;
    let (_, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let expired = auth::TokenService::new(common::TEST_SECRET, chrono::Duration::minutes(-5))
        .issue(&id)
        .unwrap();

    let response = TestApp::client()
        .get(app.url("/me"))
        .bearer_auth(&expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Your token has expired! Please log in again.");
}

#[tokio::test]
async fn test_empty_bearer_ignores_session_cookie() {
    let app = TestApp::spawn().await;
    app.signup("ahmed", "ahmed@gmail.com", "Testing").await;

    // The shared client still holds the cookie set by signup
    let response = app
        .get("/me")
        .header(header::AUTHORIZATION, "Bearer ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "You are not logged in! Please log in to get access."
    );
}

#[tokio::test]
async fn test_session_cookie_then_logout() {
    let app = TestApp::spawn().await;
    app.signup("ahmed", "ahmed@gmail.com", "Testing").await;

    // The shared client keeps the cookie set by signup
    let response = app.get("/me").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/logout").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": "success"}));

    let response = app.get("/me").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_does_not_revoke_token() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    app.get("/logout").send().await.unwrap();

    let response = TestApp::client()
        .get(app.url("/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_me_omits_role() {
    let app = TestApp::spawn().await;
    let (token, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .get_authenticated("/me", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["data"]["id"], id.as_str());
    assert_eq!(body["data"]["data"]["email"], "ahmed@gmail.com");
    assert!(body["data"]["data"].get("role").is_none());
}

#[tokio::test]
async fn test_update_password() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .patch_authenticated("/updatePassword", &token)
        .json(&json!({
            "currentPassword": "Testing",
            "newPassword": "ahmed123",
            "NewPasswordConfirm": "ahmed123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_some());

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["token"].is_string());
    assert!(body["data"]["user"]["passwordChangedAt"].is_string());

    let old_login = app
        .post("/login")
        .json(&json!({"email": "ahmed@gmail.com", "password": "Testing"}))
        .send()
        .await
        .unwrap();
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_login = app
        .post("/login")
        .json(&json!({"email": "ahmed@gmail.com", "password": "ahmed123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(new_login.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_password_wrong_current() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .patch_authenticated("/updatePassword", &token)
        .json(&json!({
            "currentPassword": "wrongPassword",
            "newPassword": "ahmed123",
            "newPasswordConfirm": "ahmed123"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Your current password is wrong.");
}

#[tokio::test]
async fn test_update_password_checks_current_before_confirmation() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .patch_authenticated("/updatePassword", &token)
        .json(&json!({
            "currentPassword": "wrongPassword",
            "newPassword": "ahmed123",
            "newPasswordConfirm": "other"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Your current password is wrong.");

    let response = app
        .patch_authenticated("/updatePassword", &token)
        .json(&json!({
            "currentPassword": "Testing",
            "newPassword": "ahmed123",
            "newPasswordConfirm": "other"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Validation failed: passwordConfirm: Passwords are not the same"
    );
}

#[tokio::test]
async fn test_update_password_wrong_field_type() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .patch_authenticated("/updatePassword", &token)
        .json(&json!({"currentPassword": 5}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn test_update_me() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .patch_authenticated("/updateMe", &token)
        .json(&json!({"name": "updated Name", "role": "admin"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["user"]["name"], "updated Name");
    assert_eq!(body["data"]["user"]["email"], "ahmed@gmail.com");
    assert_eq!(body["data"]["user"]["role"], "user");
}

#[tokio::test]
async fn test_update_me_rejects_password() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .patch_authenticated("/updateMe", &token)
        .json(&json!({"name": "x", "password": "pass1234"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "This route is not for password updates. Please use /updatePassword."
    );

    // Nothing was applied
    let me: serde_json::Value = app
        .get_authenticated("/me", &token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["data"]["data"]["name"], "ahmed");
}

#[tokio::test]
async fn test_update_me_rejects_password_whatever_the_types() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    for payload in [
        json!({"name": 5, "password": "pass1234"}),
        json!({"password": 12345678}),
    ] {
        let response = app
            .patch_authenticated("/updateMe", &token)
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "fail");
        assert_eq!(
            body["message"],
            "This route is not for password updates. Please use /updatePassword."
        );
    }

    let response = app
        .patch_authenticated("/updateMe", &token)
        .json(&json!({"name": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_me() {
    let app = TestApp::spawn().await;
    let (token, _) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let response = app
        .delete_authenticated("/deleteMe", &token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.text().await.unwrap().is_empty());

    let response = app
        .delete_authenticated("/deleteMe", &token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User belongs to this token no longer exists");
}

#[tokio::test]
async fn test_admin_route_requires_login_before_role() {
    let app = TestApp::spawn().await;
    let (token, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;

    let anonymous = TestApp::client()
        .get(app.url(&format!("/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let ordinary = app
        .get_authenticated(&format!("/{}", id), &token)
        .send()
        .await
        .unwrap();
    assert_eq!(ordinary.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = ordinary.json().await.unwrap();
    assert_eq!(
        body["message"],
        "You do not have permission to perform this action"
    );
}

#[tokio::test]
async fn test_admin_get_user() {
    let app = TestApp::spawn().await;
    let (_, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;
    let admin = app.admin_token().await;

    let response = app
        .get_authenticated(&format!("/{}", id), &admin)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["data"]["id"], id.as_str());
    assert_eq!(body["data"]["data"]["email"], "ahmed@gmail.com");
    assert!(body["data"]["data"].get("role").is_none());
}

#[tokio::test]
async fn test_admin_get_missing_and_malformed_id() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let missing = app
        .get_authenticated(&format!("/{}", uuid::Uuid::new_v4()), &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = missing.json().await.unwrap();
    assert_eq!(body["message"], "No document found with that ID");

    let malformed = app
        .get_authenticated("/not-a-uuid", &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_update_user() {
    let app = TestApp::spawn().await;
    let (_, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;
    let admin = app.admin_token().await;

    let response = app
        .patch_authenticated(&format!("/{}", id), &admin)
        .json(&json!({
            "role": "admin",
            "nameChangedCredit": 2,
            "password": "reset-pass",
            "passwordConfirm": "reset-pass"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["data"]["role"], "admin");
    assert_eq!(body["data"]["data"]["nameChangedCredit"], 2);

    let login = app
        .post("/login")
        .json(&json!({"email": "ahmed@gmail.com", "password": "reset-pass"}))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_update_invalid_is_internal_error() {
    let app = TestApp::spawn().await;
    let (_, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;
    let admin = app.admin_token().await;

    let response = app
        .patch_authenticated(&format!("/{}", id), &admin)
        .json(&json!({"email": "invalid-email"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed"));
}

#[tokio::test]
async fn test_admin_update_wrong_field_type_is_internal_error() {
    let app = TestApp::spawn().await;
    let (_, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;
    let admin = app.admin_token().await;

    let response = app
        .patch_authenticated(&format!("/{}", id), &admin)
        .json(&json!({"nameChangedCredit": "lots"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed"));
}

#[tokio::test]
async fn test_admin_update_duplicate_email_is_internal_error() {
    let app = TestApp::spawn().await;
    app.signup("ahmed", "ahmed@gmail.com", "Testing").await;
    let (_, id) = app.signup_token("sara", "sara@gmail.com", "Testing").await;
    let admin = app.admin_token().await;

    let response = app
        .patch_authenticated(&format!("/{}", id), &admin)
        .json(&json!({"email": "ahmed@gmail.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed: Duplicate"));
}

#[tokio::test]
async fn test_admin_delete_user() {
    let app = TestApp::spawn().await;
    let (token, id) = app.signup_token("ahmed", "ahmed@gmail.com", "Testing").await;
    let admin = app.admin_token().await;

    let response = app
        .delete_authenticated(&format!("/{}", id), &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let again = app
        .delete_authenticated(&format!("/{}", id), &admin)
        .send()
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    let me = app.get_authenticated("/me", &token).send().await.unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}
