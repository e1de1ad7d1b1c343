use clap::{Parser, Subcommand};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "registrations-cli")]
#[command(about = "Command-line client for the registrations facade", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/api/registrations")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registrations
    List {
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 100)]
        limit: i64,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one registration
    Get { id: String },
    /// Create a registration
    Create {
        #[arg(long)]
        store_name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Change the status of a registration (new, done, skip)
    SetStatus { id: String, status: String },
    /// Update text fields of a registration
    Update {
        id: String,
        #[arg(long)]
        store_name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a registration
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let collection = cli.url.trim_end_matches('/').to_string();
    let resource = |id: &str| format!("{collection}/{id}");

    let request: RequestBuilder = match cli.command {
        Commands::List { page, limit, search, sort } => {
            let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
            query.extend(search.map(|s| ("search", s)));
            query.extend(sort.map(|s| ("sort", s)));
            client.get(&collection).query(&query)
        }
        Commands::Get { id } => client.get(resource(&id)),
        Commands::Create { store_name, address, phone, note } => client.post(&collection).json(&json!({
            "store_name": store_name,
            "address": address,
            "phone": phone,
            "note": note,
        })),
        Commands::SetStatus { id, status } => client
            .request(Method::PATCH, resource(&id))
            .json(&json!({ "status": status })),
        Commands::Update { id, store_name, address, phone, note } => {
            let mut changes = Map::new();
            for (key, value) in [
                ("store_name", store_name),
                ("address", address),
                ("phone", phone),
                ("note", note),
            ] {
                if let Some(value) = value {
                    changes.insert(key.to_string(), Value::String(value));
                }
            }
            client.request(Method::PATCH, resource(&id)).json(&changes)
        }
        Commands::Delete { id } => client.delete(resource(&id)),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: facade returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
