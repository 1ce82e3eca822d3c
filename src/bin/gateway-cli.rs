//! Command-line client for a running travel gateway.

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query a running travel gateway", long_about = None)]
struct Cli {
    #[arg(short, long, env = "GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the gateway is up
    Health,
    /// Check the FlightAware connection through the gateway
    TestConnection,
    /// Brazil to USA departures across the major Brazilian airports
    BrazilUsa {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        include_cargo: bool,
    },
    /// Look up one flight by number, e.g. AA123
    Flight { number: String },
    /// Arrivals and/or departures for an airport
    Airport {
        code: String,
        #[arg(short = 't', long = "type", default_value = "both")]
        board: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Flights between two airports
    Route {
        origin: String,
        destination: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, query): (&str, Vec<(&str, String)>) = match cli.command {
        Commands::Health => ("/health", vec![]),
        Commands::TestConnection => ("/testConnection", vec![]),
        Commands::BrazilUsa {
            limit,
            include_cargo,
        } => (
            "/getBrazilUsaFlights",
            vec![
                ("limit", limit.to_string()),
                ("include_cargo", include_cargo.to_string()),
            ],
        ),
        Commands::Flight { number } => ("/searchFlight", vec![("flight", number)]),
        Commands::Airport { code, board, limit } => (
            "/getAirportFlights",
            vec![
                ("airport", code),
                ("type", board),
                ("limit", limit.to_string()),
            ],
        ),
        Commands::Route {
            origin,
            destination,
            limit,
        } => (
            "/getRouteFlights",
            vec![
                ("origin", origin),
                ("destination", destination),
                ("limit", limit.to_string()),
            ],
        ),
    };

    let res = client
        .get(format!("{base}{path}"))
        .query(&query)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> anyhow::Result<()> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            eprintln!("Error: gateway returned status {status}");
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: gateway returned status {status}");
            eprintln!("Response: {text}");
        }
    }
    Ok(())
}
