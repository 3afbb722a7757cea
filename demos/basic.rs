//! Basic example demonstrating the Teletype API client.
//!
//! Run with:
//! ```
//! TELETYPE_API_TOKEN=your-token cargo run --example basic
//! ```

use teletype_api::{ApiModel, TeletypeError, TeletypeServices};

fn report(e: &TeletypeError) {
    eprintln!("Api error: {e}");
    if let Some(context) = e.context() {
        for (key, value) in context.fields() {
            eprintln!("  {key}: {value}");
        }
    }
}

#[tokio::main]
async fn main() -> teletype_api::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating Teletype services...");
    let teletype = TeletypeServices::from_env()?;
    println!(
        "Connected to: {}",
        teletype.client_connection().api_base_url()
    );
    let projects = teletype.project_service()?;

    // Project details take no parameters
    println!("\n--- Project Details ---");
    let project = projects.get_project().await.inspect_err(report)?;
    println!("Project {:?}:", project.id().unwrap_or("unknown"));
    for (attribute, value) in project.as_map() {
        println!("  {attribute}: {value}");
    }
    println!("As JSON: {}", project.as_json()?);

    // Operators are cached after the first call
    println!("\n--- Operators ---");
    let operators = projects.get_operators(false).await.inspect_err(report)?;
    println!("Project has {} operators", operators.len());

    for operator in &operators {
        let name = operator.full_name().unwrap_or_default();
        let status = operator
            .status()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("  - {} {} ({})", operator.id().unwrap_or("?"), name, status);
    }

    // The owner is resolved from the cached operator list
    println!("\n--- Owner ---");
    match project.owner().await.inspect_err(report)? {
        Some(owner) => println!("Owner: {}", owner.as_json()?),
        None => println!("Owner model is empty"),
    }

    println!("\nDone!");
    Ok(())
}
