use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "pinger-cli")]
#[command(about = "Query a running pinger instance", long_about = None)]
struct Cli {
    #[arg(short, long, env = "PINGER_URL", default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness and target count
    Health,
    /// Raw Prometheus exposition
    Metrics,
    /// Active targets and per-series state
    Targets,
    /// Send a test payload to the alert webhook
    Alert {
        /// JSON payload to post
        #[arg(short, long, default_value = r#"{"source":"pinger-cli","test":true}"#)]
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", base)).send().await?;
            if let Some(text) = check_status(res).await? {
                print!("{}", text);
            }
        }
        Commands::Targets => {
            let res = client.get(format!("{}/targets", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Alert { payload } => {
            let body: Value = serde_json::from_str(&payload)?;
            let res = client
                .post(format!("{}/alert", base))
                .json(&body)
                .send()
                .await?;
            print_json(res).await?;
        }
    }

    Ok(())
}

/// Body text on success; prints the failure to stderr and returns `None` otherwise.
async fn check_status(
    res: reqwest::Response,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: pinger returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }
    Ok(Some(text))
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(text) = check_status(res).await? {
        let json: Value = serde_json::from_str(&text)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}
