//! Replicate API CLI binary.
//!
//! A command-line interface for browsing models and versions.

use clap::Parser;
use replicate::cli::{Cli, Command, ModelsCommand, VersionsCommand};
use replicate::output::PrettyPrint;
use replicate::{
    create_model, CreateModelOptions, Get, List, Model, ModelVersion, Page, ReplicateClient,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match ReplicateClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set REPLICATE_API_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &ReplicateClient, cli: Cli) -> replicate::Result<()> {
    match cli.command {
        Command::Models { action } => handle_models(client, action, cli.json).await,
        Command::Versions { action } => handle_versions(client, action, cli.json).await,
    }
}

async fn handle_models(
    client: &ReplicateClient,
    action: ModelsCommand,
    json: bool,
) -> replicate::Result<()> {
    match action {
        ModelsCommand::List { all: true } => {
            let models = Model::list_all(client, &()).await?;
            output_all(&models[..], json, |m| ModelRow::from(m))?;
        }
        ModelsCommand::List { all: false } => {
            let page = Model::list(client, &()).await?;
            output_page(&page, json, |m| ModelRow::from(m))?;
        }
        ModelsCommand::Get { model } => {
            let model = Model::get(client, model).await?;
            output_single(&model, json)?;
        }
        ModelsCommand::Create {
            model,
            hardware,
            visibility,
            description,
        } => {
            let mut options = CreateModelOptions::new(visibility.as_str(), hardware);
            options.description = description;
            let created = create_model(client, &model, &options).await?;
            output_single(&created, json)?;
        }
    }
    Ok(())
}

async fn handle_versions(
    client: &ReplicateClient,
    action: VersionsCommand,
    json: bool,
) -> replicate::Result<()> {
    match action {
        VersionsCommand::List { model, all: true } => {
            let versions = ModelVersion::list_all(client, &model).await?;
            output_all(&versions[..], json, |v| VersionRow::from(v))?;
        }
        VersionsCommand::List { model, all: false } => {
            let page = ModelVersion::list(client, &model).await?;
            output_page(&page, json, |v| VersionRow::from(v))?;
        }
        VersionsCommand::Get { model, version } => {
            let version = ModelVersion::get(client, (model, version)).await?;
            output_single(&version, json)?;
        }
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> replicate::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_all<T, R, F>(items: &[T], json: bool, to_row: F) -> replicate::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total items", items.len());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> replicate::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        // Decoded pages print the server's JSON unchanged
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        let rows: Vec<R> = page.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        match page.next {
            Some(_) => println!("\n{} items (more available, use --all)", page.len()),
            None => println!("\n{} items (end)", page.len()),
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ModelRow {
    model: String,
    visibility: String,
    runs: u64,
    description: String,
}

impl From<&Model> for ModelRow {
    fn from(m: &Model) -> Self {
        Self {
            model: m.model_ref().to_string(),
            visibility: m.visibility.clone().unwrap_or_default(),
            runs: m.run_count,
            description: m
                .description
                .as_deref()
                .map(truncate)
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct VersionRow {
    id: String,
    created: String,
    #[tabled(rename = "cog")]
    cog_version: String,
}

impl From<&ModelVersion> for VersionRow {
    fn from(v: &ModelVersion) -> Self {
        Self {
            id: v.id.clone(),
            created: v
                .created_at
                .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            cog_version: v.cog_version.clone().unwrap_or_default(),
        }
    }
}

fn truncate(s: &str) -> String {
    const MAX: usize = 60;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
