//! Integration tests for the auth service.

mod common;

use cinebook_db::AuthService;
use cinebook_shared::auth::{LoginRequest, RegisterRequest};
use cinebook_shared::{AppError, JwtConfig, JwtService};

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expires_secs: 900,
        refresh_token_expires_days: 7,
    })
}

fn register_request(username: &str, role: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: "password123".to_string(),
        role: role.to_string(),
        age: 30,
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());
    let username = common::unique("register-login");

    let registered = service
        .register(register_request(&username, "customer"))
        .await
        .expect("registration should succeed");

    assert_eq!(registered.user.username, username);
    assert_eq!(registered.user.role, "customer");
    assert_eq!(registered.user.age, 30);
    assert_eq!(registered.refresh_token.split('.').count(), 3);

    let logged_in = service
        .login(LoginRequest {
            username: username.clone(),
            password: "password123".to_string(),
        })
        .await
        .expect("login with the same credentials should succeed");

    // The issued access token is usable: it validates and carries the user.
    let claims = jwt()
        .validate_token(&logged_in.access_token)
        .expect("access token should validate");
    assert_eq!(claims.user_id(), registered.user.id);
    assert_eq!(claims.role, "customer");
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());
    let username = common::unique("duplicate");

    service
        .register(register_request(&username, "customer"))
        .await
        .expect("first registration should succeed");

    let err = service
        .register(register_request(&username, "customer"))
        .await
        .expect_err("second registration should fail");
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());

    let mut request = register_request(&common::unique("weak-pw"), "customer");
    request.password = "short".to_string();

    let err = service.register(request).await.expect_err("should fail");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());

    let err = service
        .register(register_request(&common::unique("bad-role"), "admin"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_login_wrong_password_is_generic_unauthorized() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());
    let username = common::unique("wrong-pw");

    service
        .register(register_request(&username, "customer"))
        .await
        .expect("registration should succeed");

    let err = service
        .login(LoginRequest {
            username,
            password: "password456".to_string(),
        })
        .await
        .expect_err("login should fail");

    match err {
        AppError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_unknown_user_is_generic_unauthorized() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());

    let err = service
        .login(LoginRequest {
            username: common::unique("nobody"),
            password: "password123".to_string(),
        })
        .await
        .expect_err("login should fail");

    // Same message as a wrong password: existence must not leak.
    match err {
        AppError::Unauthorized(msg) => assert_eq!(msg, "Invalid credentials"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());

    let registered = service
        .register(register_request(&common::unique("refresh"), "manager"))
        .await
        .expect("registration should succeed");

    let refreshed = service
        .refresh_token(&registered.refresh_token)
        .await
        .expect("refresh should succeed");

    // The refresh token itself is unchanged; only the access token rotates.
    assert_eq!(refreshed.refresh_token, registered.refresh_token);

    let claims = jwt()
        .validate_token(&refreshed.access_token)
        .expect("new access token should validate");
    assert_eq!(claims.user_id(), registered.user.id);
    assert_eq!(claims.role, "manager");
}

#[tokio::test]
async fn test_refresh_with_malformed_token_unauthorized() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());

    let err = service
        .refresh_token("not-a-jwt")
        .await
        .expect_err("refresh should fail");
    assert!(matches!(err, AppError::Unauthorized(_)), "got {err:?}");
}

#[tokio::test]
async fn test_refresh_with_unknown_token_unauthorized() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());

    // Well-shaped but never issued.
    let err = service
        .refresh_token("aaaa.bbbb.cccc")
        .await
        .expect_err("refresh should fail");
    assert!(matches!(err, AppError::Unauthorized(_)), "got {err:?}");
}

#[tokio::test]
async fn test_logout_revokes_every_session_and_token() {
    let Some(db) = common::setup().await else {
        return;
    };
    let service = AuthService::new(db, jwt());
    let username = common::unique("logout-all");

    // Two live sessions: one from registration, one from a later login.
    let first = service
        .register(register_request(&username, "customer"))
        .await
        .expect("registration should succeed");
    let second = service
        .login(LoginRequest {
            username,
            password: "password123".to_string(),
        })
        .await
        .expect("login should succeed");

    service
        .logout(&second.access_token)
        .await
        .expect("logout should succeed");

    // Every previously issued refresh token is dead, not just the one
    // belonging to the presented session.
    for refresh_token in [&first.refresh_token, &second.refresh_token] {
        let err = service
            .refresh_token(refresh_token)
            .await
            .expect_err("refresh after logout should fail");
        assert!(matches!(err, AppError::Unauthorized(_)), "got {err:?}");
    }

    // A second logout finds the session already revoked.
    let err = service
        .logout(&second.access_token)
        .await
        .expect_err("second logout should fail");
    assert!(matches!(err, AppError::Unauthorized(_)), "got {err:?}");
}
