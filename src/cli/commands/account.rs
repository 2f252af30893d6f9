use serde_json::Value;

use crate::cli::{CliContext, OutputFormat};

pub async fn health(ctx: &CliContext) -> anyhow::Result<()> {
    let client = ctx.client();
    let value = client.health().await?;

    match ctx.output {
        OutputFormat::Json => ctx.print_json(&value),
        OutputFormat::Text => {
            let status = value.get("status").and_then(Value::as_str).unwrap_or("unknown");
            println!("Server status: {}", status);
        }
    }
    Ok(())
}

pub async fn login(ctx: &CliContext, email: &str, password: &str) -> anyhow::Result<()> {
    let mut client = ctx.client();
    let value = client.login(email, password).await?;

    match ctx.output {
        OutputFormat::Json => ctx.print_json(&value),
        OutputFormat::Text => {
            let name = value["user"]["name"].as_str().unwrap_or(email);
            println!("Logged in as {}", name);
            if let Some(token) = client.token() {
                println!("Token: {}", token);
                println!("Export it: export PULSE_TOKEN={}", token);
            }
        }
    }
    Ok(())
}

pub async fn register(
    ctx: &CliContext,
    email: &str,
    password: &str,
    name: &str,
) -> anyhow::Result<()> {
    let mut client = ctx.client();
    let value = client.register(email, password, name).await?;

    match ctx.output {
        OutputFormat::Json => ctx.print_json(&value),
        OutputFormat::Text => {
            println!("Registered {}", email);
            if let Some(token) = client.token() {
                println!("Token: {}", token);
            }
        }
    }
    Ok(())
}

pub async fn activity(
    ctx: &CliContext,
    limit: Option<i64>,
    offset: Option<i64>,
) -> anyhow::Result<()> {
    let client = ctx.client();

    let mut params: Vec<String> = Vec::new();
    if let Some(limit) = limit {
        params.push(format!("limit={}", limit));
    }
    if let Some(offset) = offset {
        params.push(format!("offset={}", offset));
    }
    let path = if params.is_empty() {
        "/users/activity".to_string()
    } else {
        format!("/users/activity?{}", params.join("&"))
    };

    let value = client.get(&path).await?;

    match ctx.output {
        OutputFormat::Json => ctx.print_json(&value),
        OutputFormat::Text => {
            let items = value["activity"].as_array().cloned().unwrap_or_default();
            if items.is_empty() {
                println!("No recent activity");
                return Ok(());
            }
            for item in items {
                println!(
                    "{}  [{}] {} - {}",
                    item["timestamp"].as_str().unwrap_or(""),
                    item["type"].as_str().unwrap_or(""),
                    item["title"].as_str().unwrap_or(""),
                    item["details"].as_str().unwrap_or(""),
                );
            }
        }
    }
    Ok(())
}
