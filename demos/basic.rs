//! Basic example demonstrating the Replicate API client.
//!
//! Run with:
//! ```
//! REPLICATE_API_TOKEN=r8_your-token cargo run --example basic
//! ```

use replicate::{
    paginate, CancellationToken, Get, List, Model, ModelRef, ModelVersion, ReplicateClient,
};

#[tokio::main]
async fn main() -> replicate::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating Replicate client...");
    let client = ReplicateClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // List first page of models
    println!("\n--- Listing Models (first page) ---");
    let first_page = Model::list(&client, &()).await?;
    println!(
        "Found {} models (more pages: {})",
        first_page.len(),
        first_page.has_next()
    );

    for model in first_page.iter().take(5) {
        println!("  - {} ({} runs)", model.model_ref(), model.run_count);
    }

    // Walk the next three pages by hand, reading both channels
    println!("\n--- Streaming Pages ---");
    let cancel = CancellationToken::new();
    let (mut batches, mut errors) = paginate(client.clone(), first_page, cancel.clone());
    let mut seen = 0;
    loop {
        tokio::select! {
            Some(batch) = batches.recv() => {
                seen += 1;
                println!("  page {}: {} models", seen, batch.len());
                if seen == 4 {
                    cancel.cancel();
                }
            }
            Some(err) = errors.recv() => {
                println!("  stopped: {}", err);
                break;
            }
            else => break,
        }
    }

    // Get a specific model and its versions
    println!("\n--- Getting Model Details ---");
    let hello = Model::get(&client, ModelRef::new("replicate", "hello-world")).await?;
    println!("Model: {}", hello.model_ref());
    println!("  Visibility: {}", hello.visibility.as_deref().unwrap_or("unknown"));
    println!("  Runs: {}", hello.run_count);

    let versions = ModelVersion::list_all(&client, &hello.model_ref()).await?;
    println!("Found {} versions", versions.len());
    for (i, version) in versions.iter().take(5).enumerate() {
        let created = version
            .created_at
            .map(|c| c.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());
        println!("  {}. {} ({})", i + 1, version.short_id(), created);
    }

    // Decoded records serialize back to the server's exact JSON
    println!("\n--- Raw JSON ---");
    println!("{}", serde_json::to_string(&hello)?);

    Ok(())
}
