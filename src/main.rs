use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use configuration::{AnalysisConfig, DealAssumptions};
use core_types::PropertyRecord;
use metrics::{MetricsBundle, MetricsEngine};
use ranking::RankingEngine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Keystone property analysis application.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
        Commands::Rank(args) => handle_rank(args),
        Commands::Project(args) => handle_project(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A deal analysis and ranking engine for UK buy-to-let property.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute financial metrics for every property in a portfolio file.
    Analyze(AnalyzeArgs),
    /// Score and rank the portfolio, with investment recommendations.
    Rank(RankArgs),
    /// Project value and cash flow forward for one property.
    Project(ProjectArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to the JSON portfolio file (an array of property records).
    #[arg(long)]
    input: PathBuf,
    /// Optional TOML file with assumptions, weights, and benchmarks.
    #[arg(long)]
    config: Option<String>,
}

#[derive(Parser)]
struct RankArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    config: Option<String>,
    /// How many recommendations to print.
    #[arg(long, default_value_t = 3)]
    top: usize,
}

#[derive(Parser)]
struct ProjectArgs {
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    config: Option<String>,
    /// Address of the property to project; defaults to the first record.
    #[arg(long)]
    address: Option<String>,
    #[arg(long, default_value_t = 10)]
    years: u32,
    /// Annual rent growth as a fraction (0.03 = 3%).
    #[arg(long, default_value = "0.03")]
    rent_growth: Decimal,
    /// Annual expense growth as a fraction.
    #[arg(long, default_value = "0.02")]
    expense_growth: Decimal,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = load_analysis_config(args.config.as_deref())?;
    let portfolio = load_portfolio(&args.input)?;
    let engine = MetricsEngine::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Address",
        "Type",
        "Price",
        "Monthly CF",
        "Cap Rate",
        "Gross Yield",
        "CoC Return",
        "DSCR",
        "LTV",
    ]);

    for record in &portfolio {
        let metrics = engine
            .compute(record, &config.assumptions)
            .with_context(|| format!("failed to analyze {}", record.address))?;
        table.add_row(vec![
            record.address.clone(),
            record.property_type.to_string(),
            money(record.purchase_price),
            money(metrics.monthly_cash_flow),
            percent(metrics.cap_rate),
            percent(metrics.gross_rental_yield),
            opt_percent(metrics.cash_on_cash_return),
            opt_ratio(metrics.dscr),
            percent(metrics.loan_to_value),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn handle_rank(args: RankArgs) -> anyhow::Result<()> {
    let config = load_analysis_config(args.config.as_deref())?;
    let portfolio = load_portfolio(&args.input)?;
    let entries = compute_all(&portfolio, &config.assumptions)?;

    let engine = RankingEngine::new(config.weights, config.benchmarks)?;
    let ranked = engine.rank(&entries)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Rank",
        "Address",
        "Score",
        "Cap Rate",
        "Cash Flow",
        "CoC",
        "DSCR",
        "Yield",
    ]);
    for record in &ranked {
        table.add_row(vec![
            record.rank.to_string(),
            record.address.clone(),
            score(record.composite_score),
            score(record.sub_scores.cap_rate),
            score(record.sub_scores.cash_flow),
            score(record.sub_scores.cash_on_cash),
            score(record.sub_scores.dscr),
            score(record.sub_scores.gross_yield),
        ]);
    }
    println!("{table}");

    for recommendation in engine.recommendations(&ranked, args.top) {
        println!(
            "\n#{} {} — score {} ({})",
            recommendation.rank,
            recommendation.address,
            score(recommendation.composite_score),
            recommendation.risk,
        );
        if !recommendation.strengths.is_empty() {
            println!("  Strengths: {}", recommendation.strengths.join(", "));
        }
        if !recommendation.weaknesses.is_empty() {
            println!("  Weaknesses: {}", recommendation.weaknesses.join(", "));
        }
    }

    Ok(())
}

fn handle_project(args: ProjectArgs) -> anyhow::Result<()> {
    let config = load_analysis_config(args.config.as_deref())?;
    let portfolio = load_portfolio(&args.input)?;

    let record = match &args.address {
        Some(address) => portfolio
            .iter()
            .find(|r| &r.address == address)
            .with_context(|| format!("no property with address {:?}", address))?,
        None => portfolio
            .first()
            .context("the portfolio file contains no properties")?,
    };

    let engine = MetricsEngine::new();
    let projections = engine.project_cash_flows(
        record,
        &config.assumptions,
        args.years,
        args.rent_growth,
        args.expense_growth,
    )?;

    println!(
        "{} — {} year projection at {} appreciation",
        record.address,
        args.years,
        percent(config.assumptions.appreciation_rate)
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Year",
        "Monthly Rent",
        "Monthly Expenses",
        "NOI",
        "Annual CF",
        "Projected Value",
    ]);
    for projection in &projections {
        table.add_row(vec![
            projection.year.to_string(),
            money(projection.monthly_rent),
            money(projection.monthly_expenses),
            money(projection.net_operating_income),
            money(projection.annual_cash_flow),
            money(projection.projected_value),
        ]);
    }
    println!("{table}");

    Ok(())
}

// ==============================================================================
// Input Loading
// ==============================================================================

fn load_analysis_config(path: Option<&str>) -> anyhow::Result<AnalysisConfig> {
    match path {
        Some(path) => configuration::load_config(path)
            .with_context(|| format!("failed to load configuration from {path}")),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_portfolio(path: &PathBuf) -> anyhow::Result<Vec<PropertyRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read portfolio file {}", path.display()))?;
    let portfolio: Vec<PropertyRecord> =
        serde_json::from_str(&raw).context("portfolio file is not a valid record array")?;
    tracing::info!(properties = portfolio.len(), path = %path.display(), "loaded portfolio");
    Ok(portfolio)
}

fn compute_all(
    portfolio: &[PropertyRecord],
    assumptions: &DealAssumptions,
) -> anyhow::Result<Vec<(String, MetricsBundle)>> {
    let engine = MetricsEngine::new();
    portfolio
        .iter()
        .map(|record| {
            let metrics = engine
                .compute(record, assumptions)
                .with_context(|| format!("failed to analyze {}", record.address))?;
            Ok((record.address.clone(), metrics))
        })
        .collect()
}

// ==============================================================================
// Presentation Formatting
// ==============================================================================
// The engines emit unrounded fractions; everything below is display-only.

fn money(value: Decimal) -> String {
    format!("£{}", value.round_dp(2))
}

fn percent(value: Decimal) -> String {
    format!("{}%", (value * dec!(100)).round_dp(2))
}

fn opt_percent(value: Option<Decimal>) -> String {
    value.map(percent).unwrap_or_else(|| "n/a".to_string())
}

fn opt_ratio(value: Option<Decimal>) -> String {
    match value {
        Some(value) => value.round_dp(2).to_string(),
        None => "no debt".to_string(),
    }
}

fn score(value: Decimal) -> String {
    value.round_dp(3).to_string()
}
