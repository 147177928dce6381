//! Command-line client for the UMVVS calculator, through the local proxy.

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use thiserror::Error;
use url::Url;

#[derive(Parser)]
#[command(name = "umvvs-cli")]
#[command(about = "Query the UMVVS vehicle valuation calculator", long_about = None)]
struct Cli {
    /// Calculator base URL; the proxy prefix or the upstream itself.
    #[arg(short, long, default_value = "http://127.0.0.1:8000/umvvs")]
    base: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List vehicle makes
    Makes,
    /// Call any endpoint with key=value query parameters
    Get {
        endpoint: String,
        params: Vec<String>,
    },
    /// Resolve a vehicle through the full selection chain
    Lookup(LookupArgs),
}

#[derive(clap::Args, Debug, Default)]
struct LookupArgs {
    #[arg(long)]
    make_id: Option<u64>,
    #[arg(long)]
    make_name: Option<String>,
    #[arg(long, default_value = "COROLLA FIELDER")]
    model_body: String,
    #[arg(long, default_value = "2015")]
    yom: String,
    #[arg(long, default_value = "JAPAN")]
    country_of_origin: String,
    #[arg(long, default_value = "PETROL & ELECTRIC")]
    fuel_type: String,
    #[arg(long, default_value = "1001 - 1500 CC")]
    engine_capacity: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("HTTP {status} for {url}")]
    Http { status: u16, url: String, body: String },

    #[error("Non-JSON response for {url}")]
    NonJson { url: String, body: String },

    #[error("No options returned for {0}")]
    NoOptions(String),

    #[error("Invalid parameter {0:?}, expected key=value")]
    InvalidParam(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

impl CliError {
    /// `status` and a non-empty `body` appear only when the error carries them.
    fn to_json(&self) -> Value {
        let mut error = Map::new();
        error.insert("message".into(), Value::from(self.to_string()));
        let (status, body) = match self {
            CliError::Http { status, body, .. } => (Some(*status), Some(body)),
            CliError::NonJson { body, .. } => (None, Some(body)),
            _ => (None, None),
        };
        if let Some(status) = status {
            error.insert("status".into(), Value::from(status));
        }
        if let Some(body) = body.filter(|b| !b.is_empty()) {
            error.insert("body".into(), Value::from(body.as_str()));
        }
        json!({ "error": error })
    }
}

/// Thin JSON client over the calculator endpoints.
struct Calculator {
    client: reqwest::Client,
    base: String,
}

impl Calculator {
    fn new(base: String) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("umvvs-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    fn url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, CliError> {
        build_url(&self.base, endpoint, params)
    }

    async fn fetch(&self, url: &Url) -> Result<Value, CliError> {
        let res = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(CliError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|_| CliError::NonJson {
            url: url.to_string(),
            body: text,
        })
    }

    /// Fetch and record the exchange under the endpoint name.
    async fn step(
        &self,
        responses: &mut Map<String, Value>,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, CliError> {
        let url = self.url(endpoint, params)?;
        let data = self.fetch(&url).await?;
        responses.insert(
            endpoint.to_string(),
            json!({ "url": url.as_str(), "data": data.clone() }),
        );
        Ok(data)
    }
}

fn build_url(base: &str, endpoint: &str, params: &[(&str, String)]) -> Result<Url, CliError> {
    let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), endpoint))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(url)
}

fn parse_param(raw: &str) -> Result<(&str, String), CliError> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key, value.to_string()))
        .ok_or_else(|| CliError::InvalidParam(raw.to_string()))
}

/// Render a JSON scalar the way it appears in a query string.
fn as_param(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Choose an option by `field`: exact match, then substring, then the first.
///
/// Matching ignores ASCII case. With no request the first option wins.
fn pick_option<'a>(options: &'a Value, field: &str, requested: Option<&str>) -> Result<&'a Value, CliError> {
    let list = options
        .as_array()
        .filter(|l| !l.is_empty())
        .ok_or_else(|| CliError::NoOptions(field.to_string()))?;

    let Some(requested) = requested else {
        return Ok(&list[0]);
    };
    let wanted = requested.to_lowercase();
    let text = |o: &Value| o.get(field).map(as_param).unwrap_or_default().to_lowercase();

    Ok(list
        .iter()
        .find(|o| text(*o) == wanted)
        .or_else(|| list.iter().find(|o| text(*o).contains(&wanted)))
        .unwrap_or(&list[0]))
}

/// Make used when none is named.
const DEFAULT_MAKE: &str = "TOYOTA";

/// Choose a make: by name when one is given, else exactly `TOYOTA`, else the first.
fn pick_make<'a>(makes: &'a Value, requested: Option<&str>) -> Result<&'a Value, CliError> {
    if requested.is_some() {
        return pick_option(makes, "makeName", requested);
    }
    let default = makes.as_array().and_then(|list| {
        list.iter()
            .find(|m| m.get("makeName").and_then(Value::as_str) == Some(DEFAULT_MAKE))
    });
    match default {
        Some(make) => Ok(make),
        None => pick_option(makes, "makeName", None),
    }
}

fn pick_field(options: &Value, field: &str, requested: Option<&str>) -> Result<Value, CliError> {
    let option = pick_option(options, field, requested)?;
    Ok(option.get(field).cloned().unwrap_or(Value::Null))
}

async fn lookup(calc: &Calculator, args: &LookupArgs) -> Result<Value, CliError> {
    let mut responses = Map::new();

    let make_id = match args.make_id {
        Some(id) => Value::from(id),
        None => {
            let makes = calc.step(&mut responses, "getMakes", &[]).await?;
            let make = pick_make(&makes, args.make_name.as_deref())?;
            make.get("makeId").cloned().unwrap_or(Value::Null)
        }
    };
    let make = ("makeId", as_param(&make_id));

    let options = calc.step(&mut responses, "getModelBody", &[make.clone()]).await?;
    let model_body = pick_field(&options, "modelBody", Some(args.model_body.as_str()))?;
    let model = ("modelBody", as_param(&model_body));

    let options = calc
        .step(&mut responses, "getYom", &[make.clone(), model.clone()])
        .await?;
    let yom = pick_field(&options, "yom", Some(args.yom.as_str()))?;
    let year = ("yom", as_param(&yom));

    let options = calc
        .step(
            &mut responses,
            "getCountryOfOrigin",
            &[make.clone(), model.clone(), year.clone()],
        )
        .await?;
    let country = pick_field(&options, "countryOfOrigin", Some(args.country_of_origin.as_str()))?;

    let options = calc
        .step(
            &mut responses,
            "getFuelType",
            &[
                make.clone(),
                model.clone(),
                year.clone(),
                ("countryOfOrigin", as_param(&country)),
            ],
        )
        .await?;
    let fuel_type = pick_field(&options, "fuelType", Some(args.fuel_type.as_str()))?;

    let options = calc
        .step(
            &mut responses,
            "getEngineCapacity",
            &[
                make.clone(),
                model.clone(),
                year.clone(),
                ("countryOfOrigin", as_param(&country)),
                ("fuelType", as_param(&fuel_type)),
            ],
        )
        .await?;
    let engine_capacity = pick_field(&options, "engineCapacity", Some(args.engine_capacity.as_str()))?;

    // The details endpoint spells the country parameter "cuntryOfOrigin".
    let details = calc
        .step(
            &mut responses,
            "getVehicleDetails",
            &[
                make,
                model,
                year,
                ("cuntryOfOrigin", as_param(&country)),
                ("fuelType", as_param(&fuel_type)),
                ("engineCapacity", as_param(&engine_capacity)),
            ],
        )
        .await?;

    let vehicle = match &details {
        Value::Array(items) => items.first().cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };

    Ok(json!({
        "inputs": {
            "makeId": make_id,
            "modelBody": model_body,
            "yom": yom,
            "countryOfOrigin": country,
            "fuelType": fuel_type,
            "engineCapacity": engine_capacity,
        },
        "vehicle": vehicle,
        "responses": responses,
    }))
}

async fn execute(cli: Cli) -> Result<Value, CliError> {
    let calc = Calculator::new(cli.base)?;

    match cli.command {
        Commands::Makes => {
            let url = calc.url("getMakes", &[])?;
            calc.fetch(&url).await
        }
        Commands::Get { endpoint, params } => {
            let params = params
                .iter()
                .map(|p| parse_param(p))
                .collect::<Result<Vec<_>, _>>()?;
            let url = calc.url(&endpoint, &params)?;
            calc.fetch(&url).await
        }
        Commands::Lookup(args) => lookup(&calc, &args).await,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match execute(cli).await {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_json())?);
            std::process::exit(1);
        }
    }
}
