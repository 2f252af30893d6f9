use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::{CliContext, OutputFormat};
use crate::client::notifications::{ListOptions, NotificationsStore};
use crate::handlers::notifications::SendNotificationRequest;

#[derive(Subcommand)]
pub enum NotifyCommands {
    #[command(about = "Dispatch a notification through the ntfy relay")]
    Send {
        #[arg(help = "Service ID the notification is about")]
        service_id: Uuid,
        #[arg(help = "Notification title")]
        title: String,
        #[arg(help = "Notification message")]
        message: String,
        #[arg(long, help = "Priority (low, medium, high)")]
        priority: Option<String>,
    },

    #[command(about = "List notifications")]
    List {
        #[arg(long, help = "Filter by status (unread, read, pending, sent, failed)")]
        status: Option<String>,
        #[arg(long, help = "Filter by priority")]
        priority: Option<String>,
        #[arg(long, help = "Max items to return")]
        limit: Option<i64>,
        #[arg(long, help = "Items to skip")]
        offset: Option<i64>,
    },

    #[command(about = "Mark all unread notifications as read")]
    ReadAll,

    #[command(about = "Aggregate notification statistics")]
    Stats,
}

pub async fn handle(cmd: NotifyCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let mut store = NotificationsStore::new(ctx.client());

    match cmd {
        NotifyCommands::Send { service_id, title, message, priority } => {
            let payload = SendNotificationRequest {
                service_id: Some(service_id),
                title: Some(title),
                message: Some(message),
                priority,
                config: json!({}),
            };
            let value = store.send_notification(&payload).await?;
            match ctx.output {
                OutputFormat::Json => ctx.print_json(&value),
                OutputFormat::Text => {
                    let status = value["notification"]["status"].as_str().unwrap_or("unknown");
                    println!("Dispatch status: {}", status);
                }
            }
        }
        NotifyCommands::List { status, priority, limit, offset } => {
            let options = ListOptions {
                limit,
                offset,
                status,
                priority,
                service_id: None,
            };
            store.fetch_notifications(&options).await?;
            match ctx.output {
                OutputFormat::Json => {
                    ctx.print_json(&serde_json::to_value(&store.notifications)?)
                }
                OutputFormat::Text => {
                    if store.notifications.is_empty() {
                        println!("No notifications");
                    }
                    for notification in &store.notifications {
                        println!(
                            "{}  {:<8} {:<8} {}  {}",
                            notification.id,
                            notification.status,
                            notification.priority,
                            notification.title,
                            notification.message,
                        );
                    }
                }
            }
        }
        NotifyCommands::ReadAll => {
            store.mark_all_as_read().await?;
            println!("All notifications marked as read");
        }
        NotifyCommands::Stats => {
            store.fetch_stats().await?;
            match ctx.output {
                OutputFormat::Json => ctx.print_json(&serde_json::to_value(&store.stats)?),
                OutputFormat::Text => {
                    let stats = &store.stats;
                    println!("Total: {}", stats.total);
                    println!(
                        "  unread: {}  read: {}  pending: {}  sent: {}  failed: {}",
                        stats.unread, stats.read, stats.pending, stats.sent, stats.failed
                    );
                    println!(
                        "  priority high: {}  medium: {}  low: {}",
                        stats.high_priority, stats.medium_priority, stats.low_priority
                    );
                    for (service, count) in &stats.by_service {
                        println!("  service {}: {}", service, count);
                    }
                }
            }
        }
    }

    Ok(())
}
