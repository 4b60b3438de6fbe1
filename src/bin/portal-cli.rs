use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "portal-cli")]
#[command(about = "Command-line client for the report portal API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user account
    Register {
        username: String,
        password: String,
        role: String,
    },
    /// Check credentials and print the user's role
    Login { username: String, password: String },
    /// List every submitted report
    Reports,
    /// Find reports by lecturer name substring
    Search { lecturer_name: String },
    /// Save the Excel export of all reports
    Download {
        #[arg(short, long, default_value = "reports.xlsx")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api", cli.url.trim_end_matches('/'));

    match cli.command {
        Commands::Register {
            username,
            password,
            role,
        } => {
            let res = client
                .post(format!("{api}/register"))
                .json(&json!({ "username": username, "password": password, "role": role }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login { username, password } => {
            let res = client
                .post(format!("{api}/login"))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Reports => {
            let res = client.get(format!("{api}/reports")).send().await?;
            print_response(res).await?;
        }
        Commands::Search { lecturer_name } => {
            let res = client
                .get(format!("{api}/search-report"))
                .query(&[("lecturer_name", lecturer_name)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Download { output } => {
            let res = client.get(format!("{api}/download-report")).send().await?;
            let status = res.status();
            let bytes = res.bytes().await?;
            if !status.is_success() {
                eprintln!("Response: {}", String::from_utf8_lossy(&bytes));
            }
            ensure_success(status)?;
            tokio::fs::write(&output, &bytes).await?;
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let pretty = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or(text);

    if !status.is_success() {
        eprintln!("Response: {}", pretty);
    }
    ensure_success(status)?;
    println!("{}", pretty);
    Ok(())
}

/// Non-2xx responses become the process error so the exit code is non-zero.
fn ensure_success(status: StatusCode) -> Result<(), Box<dyn std::error::Error>> {
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("API returned status {status}").into())
    }
}
