use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::api::{ApiClient, ApiConfig, DEFAULT_BASE_URL};
use crate::core::{
    AllocationForm, AllocationSet, ChartPoint, FormVariant, MAX_PERCENT, Metrics, Session,
    SubmitOutcome, format_metric, format_metric_value, ordered_metrics, portfolio_series,
    validate_login,
};

#[derive(Parser, Debug)]
#[command(
    name = "investsim",
    about = "Risk assessment and portfolio simulation client"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "INVESTSIM_API_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Base URL of the investment API"
    )]
    base_url: String,
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        help = "Request timeout in seconds"
    )]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print a bearer token for `simulate`.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "INVESTSIM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Run a risk assessment.
    Assess(FormArgs),
    /// Simulate a portfolio over a number of years.
    Simulate {
        #[command(flatten)]
        form: FormArgs,
        #[arg(long, env = "INVESTSIM_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
struct FormArgs {
    #[arg(long, allow_negative_numbers = true, help = "Amount to invest")]
    amount: Option<f64>,
    #[arg(
        long,
        default_value_t = 5,
        help = "Years; 5, 10 or 20 for assessments, 1-20 for simulations"
    )]
    duration: u32,
    #[arg(long, default_value_t = 50, help = "Risk appetite in percent")]
    risk_appetite: u32,
    #[arg(long, default_value_t = 40, help = "Stocks allocation in percent")]
    stocks: u32,
    #[arg(long, default_value_t = 30, help = "Bonds allocation in percent")]
    bonds: u32,
    #[arg(long, default_value_t = 20, help = "Real estate allocation in percent")]
    real_estate: u32,
    #[arg(long, default_value_t = 10, help = "Commodities allocation in percent")]
    commodities: u32,
    #[arg(long, help = "Print the result as JSON")]
    json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    metrics: &'a Metrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    portfolio_series: Option<Vec<ChartPoint>>,
}

pub async fn run(cli: Cli) -> Result<(), String> {
    let client = ApiClient::new(ApiConfig {
        base_url: cli.base_url,
        timeout: Duration::from_secs(cli.timeout_secs),
    })
    .map_err(|e| e.to_string())?;

    match cli.command {
        Command::Login { email, password } => {
            let request = validate_login(&email, &password).map_err(|e| e.to_string())?;
            let session = client.login(&request).await.map_err(|e| e.to_string())?;
            let token = session
                .token()
                .ok_or_else(|| "login returned no token".to_string())?;
            if let Some(name) = session.user_name() {
                eprintln!("Logged in as {name}");
            }
            println!("{}", token.as_str());
            Ok(())
        }
        Command::Assess(args) => {
            let form = build_form(FormVariant::RiskAssessment, &args)?;
            let form = submit(form, &client, &Session::anonymous()).await?;
            report(&form, &args, false)
        }
        Command::Simulate { form: args, token } => {
            let session = Session::from_raw_token(token.as_deref());
            let form = build_form(FormVariant::Simulation, &args)?;
            let form = submit(form, &client, &session).await?;
            report(&form, &args, true)
        }
    }
}

fn build_form(variant: FormVariant, args: &FormArgs) -> Result<AllocationForm, String> {
    if args.risk_appetite > u32::from(MAX_PERCENT) {
        return Err("--risk-appetite must be between 0 and 100".to_string());
    }

    let allocation = AllocationSet::new(
        args.stocks,
        args.bonds,
        args.real_estate,
        args.commodities,
    )
    .map_err(|e| e.to_string())?;

    let mut form = AllocationForm::new(variant)
        .with_allocation(allocation)
        .map_err(|e| e.to_string())?;
    form.set_investment_amount(args.amount);
    form.set_duration(args.duration)
        .map_err(|e| format!("--duration: {e}"))?;
    form.set_risk_appetite(args.risk_appetite);
    Ok(form)
}

async fn submit(
    mut form: AllocationForm,
    client: &ApiClient,
    session: &Session,
) -> Result<AllocationForm, String> {
    match form.submit(client, session).await {
        SubmitOutcome::Succeeded => Ok(form),
        _ => Err(form
            .error()
            .unwrap_or("submission did not complete")
            .to_string()),
    }
}

fn report(form: &AllocationForm, args: &FormArgs, with_series: bool) -> Result<(), String> {
    let metrics = form
        .result()
        .ok_or_else(|| "no result available".to_string())?;
    let state = form.state();
    let series = with_series
        .then(|| portfolio_series(state.investment_amount.unwrap_or_default(), state.duration, metrics));

    if args.json {
        let report = Report {
            metrics,
            portfolio_series: series,
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    for (name, value) in ordered_metrics(metrics) {
        println!("{name:<28} {}", format_metric_value(value));
    }
    if let Some(points) = series {
        println!();
        println!("Portfolio value");
        for point in points {
            println!("  {:<10} {:>18}", point.label, format_metric(point.value));
        }
    }
    Ok(())
}
