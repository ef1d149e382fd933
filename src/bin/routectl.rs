use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use typed_router::config::load_config;
use typed_router::lifecycle::startup::build_routes;
use typed_router::routing::dispatcher::extract;
use typed_router::routing::{compile, CaptureValue};

#[derive(Parser)]
#[command(name = "routectl")]
#[command(about = "Inspect path templates and manage a running typed-router", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a template and print the generated pattern
    Validate { template: String },
    /// Match a path against a template and print the captures
    Match { template: String, path: String },
    /// Load and validate a configuration file
    CheckConfig { file: PathBuf },
    /// List the routes of a running server through the admin API
    Routes {
        #[arg(short, long, default_value = "http://localhost:8081")]
        url: String,

        #[arg(short, long, env = "TYPED_ROUTER_ADMIN_KEY")]
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { template } => {
            let pattern = compile(&template)?;
            println!("pattern = {}", pattern);
            for (name, kind) in pattern.captures() {
                println!("  {} : {}", name, kind);
            }
        }
        Commands::Match { template, path } => {
            let pattern = compile(&template)?;
            match extract(&pattern, &path) {
                Some(captures) => {
                    println!("match");
                    for (name, value) in captures.iter() {
                        match value {
                            CaptureValue::Str(s) => println!("  {} = {:?}", name, s),
                            CaptureValue::Int(n) => println!("  {} = {}", name, n),
                            CaptureValue::Failed(e) => println!("  {} ! {}", name, e),
                        }
                    }
                }
                None => {
                    println!("no match");
                    std::process::exit(1);
                }
            }
        }
        Commands::CheckConfig { file } => {
            let config = load_config(&file)?;
            let routes = build_routes(&config)?;
            println!("{}: ok, {} routes", file.display(), routes.len());
            for (position, route) in routes.iter().enumerate() {
                println!("  {:>3} {:<20} {}", position, route.name(), route.pattern());
            }
        }
        Commands::Routes { url, key } => {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);

            let res = reqwest::Client::new()
                .get(format!("{}/admin/routes", url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
