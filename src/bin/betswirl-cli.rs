use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "betswirl-cli")]
#[command(about = "Command line client for a running betswirl-tools server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:8090")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Health,
    /// List the available tools and their parameters
    Tools,
    /// Call a tool, e.g. `call betswirl.dice --args '{"number":50,"betAmount":"0.01"}'`
    Call {
        /// Tool name
        name: String,
        /// JSON argument object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request_id = Uuid::new_v4().to_string();
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", HeaderValue::from_str(&request_id)?);

    match cli.command {
        Commands::Health => {
            let res = client
                .get(format!("{}/health", base))
                .headers(headers)
                .send()
                .await?;
            print_response(res, &request_id).await?;
        }
        Commands::Tools => {
            let res = client
                .get(format!("{}/tools", base))
                .headers(headers)
                .send()
                .await?;
            print_response(res, &request_id).await?;
        }
        Commands::Call { name, args } => {
            let args: Value = serde_json::from_str(&args)
                .map_err(|e| format!("--args is not valid JSON: {}", e))?;
            let res = client
                .post(format!("{}/tools/{}", base, name))
                .headers(headers)
                .json(&args)
                .send()
                .await?;
            print_response(res, &request_id).await?;
        }
    }

    Ok(())
}

async fn print_response(
    res: reqwest::Response,
    request_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {} (request id {})", status, request_id);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
