//! Marketing Dashboard — loads per-channel ad spend and business outcome
//! files, then prints one dashboard page for the requested filter.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use dashboard_core::{AppConfig, Channel, ChannelSelector, DateRange, FilterSpec, Page};
use dashboard_reporting::{kpi, DashboardPipeline, PageView, ViewState};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "marketing-dashboard")]
#[command(about = "Marketing intelligence dashboard over channel spend and business outcomes")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(long, env = "MARKETING_DASHBOARD_CONFIG")]
    config: Option<String>,

    /// Business outcomes CSV (overrides config)
    #[arg(long)]
    business: Option<String>,

    /// Facebook CSV (overrides config)
    #[arg(long)]
    facebook: Option<String>,

    /// Google CSV (overrides config)
    #[arg(long)]
    google: Option<String>,

    /// TikTok CSV (overrides config)
    #[arg(long)]
    tiktok: Option<String>,

    /// overview, performance, funnel, campaigns or states
    #[arg(long, default_value = "overview")]
    page: Page,

    /// First date, inclusive (defaults to the earliest date in the data)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date, inclusive (defaults to the latest date in the data)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// "All" or a channel name
    #[arg(long, default_value = "All")]
    channel: ChannelSelector,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketing_dashboard=info,dashboard_reporting=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e).context("Failed to load config file"),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        }
    };

    // Apply CLI overrides
    if let Some(path) = cli.business {
        config.data.business_path = path;
    }
    for (channel, path) in [
        (Channel::Facebook, cli.facebook),
        (Channel::Google, cli.google),
        (Channel::TikTok, cli.tiktok),
    ] {
        if let Some(path) = path {
            config.data.set_source_path(channel, path);
        }
    }

    let pipeline =
        DashboardPipeline::load(&config.data).context("Failed to load dashboard data")?;

    let controls = pipeline.controls();
    let start = cli.start.or(controls.min_date).unwrap_or(NaiveDate::MIN);
    let end = cli.end.or(controls.max_date).unwrap_or(NaiveDate::MAX);
    let filter = FilterSpec::new(DateRange::new(start, end), cli.channel);

    info!(
        fact_rows = pipeline.facts().len(),
        page = ?cli.page,
        %start,
        %end,
        channel = %cli.channel,
        "Dashboard ready"
    );

    let state = pipeline.recompute(&filter);
    match cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&state.page(cli.page))?);
        }
        OutputFormat::Text => print_text(cli.page, &state),
    }

    Ok(())
}

fn print_text(page: Page, state: &ViewState) {
    println!("{}", page.title());
    println!(
        "{} to {} | channel: {} | rows: {}",
        state.filter.range.start, state.filter.range.end, state.filter.channel, state.row_count
    );
    println!();

    match state.page(page) {
        PageView::Overview { cards, .. } => {
            for card in cards {
                println!("{:<16} {}", card.title, card.value);
            }
        }
        PageView::Performance { points } => {
            println!("{:<12} {:>14} {:>14}", "date", "spend", "total_revenue");
            for p in points {
                println!("{:<12} {:>14.2} {:>14.2}", p.date, p.spend, p.total_revenue);
            }
        }
        PageView::Funnel { funnel } => {
            for step in funnel.steps {
                let conversion = kpi::format_percent(step.conversion_from_previous);
                println!("{:<12} {:>16.0} {:>10}", step.label, step.value, conversion);
            }
        }
        PageView::Campaigns { rows } => {
            println!(
                "{:<24} {:<10} {:<8} {:>12} {:>18}",
                "campaign", "channel", "state", "spend", "attributed_revenue"
            );
            for r in rows {
                println!(
                    "{:<24} {:<10} {:<8} {:>12.2} {:>18.2}",
                    r.campaign, r.channel, r.state, r.spend, r.attributed_revenue
                );
            }
        }
        PageView::States { rows } => {
            println!("{:<8} {:>14} {:>18}", "state", "impressions", "attributed_revenue");
            for r in rows {
                println!(
                    "{:<8} {:>14} {:>18.2}",
                    r.state, r.impressions, r.attributed_revenue
                );
            }
        }
    }
}
