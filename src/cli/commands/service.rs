use clap::Subcommand;
use uuid::Uuid;

use crate::cli::{CliContext, OutputFormat};
use crate::client::services::{SearchFilters, ServicesStore};
use crate::handlers::services::CreateServiceRequest;

#[derive(Subcommand)]
pub enum ServiceCommands {
    #[command(about = "List all services")]
    List,

    #[command(about = "Create a new service")]
    Create {
        #[arg(help = "Service name")]
        name: String,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long = "type", help = "Service type (general, http, tcp, script, process, api)")]
        service_type: Option<String>,
        #[arg(long, help = "Status (active, inactive, completed, error)")]
        status: Option<String>,
        #[arg(long, help = "Priority (low, medium, high)")]
        priority: Option<String>,
        #[arg(long, help = "Comma-separated tags")]
        tags: Option<String>,
    },

    #[command(about = "Delete a service")]
    Delete {
        #[arg(help = "Service ID")]
        id: Uuid,
    },

    #[command(about = "Search services in the local cache")]
    Search {
        #[arg(help = "Substring to match against name/description")]
        query: Option<String>,
        #[arg(long, help = "Filter by status")]
        status: Option<String>,
        #[arg(long, help = "Filter by priority")]
        priority: Option<String>,
        #[arg(long, help = "Filter by any of these comma-separated tags")]
        tags: Option<String>,
    },

    #[command(about = "Aggregate service statistics")]
    Stats,
}

pub async fn handle(cmd: ServiceCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let mut store = ServicesStore::new(ctx.client());

    match cmd {
        ServiceCommands::List => {
            store.fetch_services().await?;
            match ctx.output {
                OutputFormat::Json => ctx.print_json(&serde_json::to_value(&store.services)?),
                OutputFormat::Text => print_services(store.services.iter()),
            }
        }
        ServiceCommands::Create { name, description, service_type, status, priority, tags } => {
            let payload = CreateServiceRequest {
                name: Some(name),
                description,
                r#type: service_type,
                status,
                priority,
                config: None,
                metadata: None,
                tags: tags.map(|t| t.split(',').map(|s| s.trim().to_string()).collect()),
            };
            let service = store.create_service(&payload).await?;
            match ctx.output {
                OutputFormat::Json => ctx.print_json(&serde_json::to_value(&service)?),
                OutputFormat::Text => {
                    println!("Created service {} ({})", service.name, service.id)
                }
            }
        }
        ServiceCommands::Delete { id } => {
            store.delete_service(id).await?;
            println!("Deleted service {}", id);
        }
        ServiceCommands::Search { query, status, priority, tags } => {
            store.fetch_services().await?;
            let filters = SearchFilters {
                r#type: None,
                status,
                priority,
                tags: tags
                    .map(|t| t.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_default(),
            };
            let hits = store.search(query.as_deref().unwrap_or(""), &filters);
            match ctx.output {
                OutputFormat::Json => ctx.print_json(&serde_json::to_value(&hits)?),
                OutputFormat::Text => print_services(hits.into_iter()),
            }
        }
        ServiceCommands::Stats => {
            store.fetch_stats().await?;
            match ctx.output {
                OutputFormat::Json => ctx.print_json(&serde_json::to_value(&store.stats)?),
                OutputFormat::Text => {
                    let stats = &store.stats;
                    println!("Total: {}", stats.total);
                    println!("  active: {}  inactive: {}  completed: {}", stats.active, stats.inactive, stats.completed);
                    println!(
                        "  priority high: {}  medium: {}  low: {}",
                        stats.high_priority, stats.medium_priority, stats.low_priority
                    );
                    for (service_type, count) in &stats.by_type {
                        println!("  type {}: {}", service_type, count);
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_services<'a>(services: impl Iterator<Item = &'a crate::database::models::Service>) {
    let mut empty = true;
    for service in services {
        empty = false;
        println!(
            "{}  {:<24} {:<10} {:<8} {}",
            service.id, service.name, service.status, service.priority, service.r#type
        );
    }
    if empty {
        println!("No services");
    }
}
