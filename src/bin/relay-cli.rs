use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for a running CORS relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Origin header to present; omitted when not set
    #[arg(short, long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show relay status and the allowed hosts
    Status {
        #[arg(long, default_value = "/status")]
        path: String,
    },
    /// Fetch a target URL through the relay
    Fetch {
        target: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        #[arg(long, default_value = "/proxy")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(origin) = &cli.origin {
        headers.insert(ORIGIN, HeaderValue::from_str(origin)?);
    }

    match cli.command {
        Commands::Status { path } => {
            let res = client
                .get(format!("{}{}", cli.url, path))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Fetch { target, method, path } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())?;
            let res = client
                .request(method, format!("{}{}", cli.url, path))
                .query(&[("url", target.as_str())])
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
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
