mod common;

use anyhow::Result;
use reqwest::StatusCode;

/// Every protected resource rejects requests without a bearer token.
#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/services",
        "/api/notifications",
        "/api/users/profile",
        "/api/users/activity",
        "/api/ntfy-config",
    ] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path: {}", path);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], "Access token required", "path: {}", path);
    }
    Ok(())
}

/// A present-but-bogus token is a 403, not a 401.
#[tokio::test]
async fn invalid_tokens_are_forbidden() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/services", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Invalid token");
    Ok(())
}

/// Non-bearer Authorization schemes count as missing credentials.
#[tokio::test]
async fn basic_auth_is_not_accepted() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/services", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
