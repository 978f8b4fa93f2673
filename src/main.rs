//! Retrospective dashboard CLI
//!
//! Renders the quantitative and textual views of a retrospective workbook
//! as plain text or JSON.

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use retro_dashboard::RetrospectiveFilter;
use retro_dashboard::Selection;
use retro_dashboard::Session;
use retro_dashboard::Tab;
use retro_dashboard::View;
use retro_dashboard::WorkbookSource;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retro-dashboard")]
#[command(about = "Interactive analysis of retrospective survey workbooks", long_about = None)]
struct Cli {
    /// Retrospective workbook (.xlsx)
    workbook: Option<PathBuf>,

    /// Retrospectives to include, as sheet names or glob patterns (default: all)
    #[arg(long = "retro", value_name = "GLOB")]
    retrospectives: Vec<String>,

    /// Question group to chart (default: the first group)
    #[arg(long)]
    group: Option<String>,

    /// Analyze by grouped theme or individual question
    #[arg(long, default_value = "grouped")]
    view: View,

    /// Question of the individual view (default: the group's first question)
    #[arg(long)]
    question: Option<String>,

    /// Hide the overall average line of the individual view
    #[arg(long)]
    no_average_line: bool,

    /// Reflection question to analyse (default: the first long-form column)
    #[arg(long)]
    reflection: Option<String>,

    /// Number of most positive and most negative responses to list
    #[arg(long, default_value = "3")]
    top: usize,

    /// Tabs to render (quantitative, textual, all)
    #[arg(long, default_value = "all")]
    tab: Tab,

    /// Output format
    #[arg(long, default_value = "text")]
    format: Format,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn selection(&self) -> Result<Selection> {
        let retrospectives = if self.retrospectives.is_empty() {
            RetrospectiveFilter::all()
        } else {
            RetrospectiveFilter::patterns(&self.retrospectives).context("Invalid --retro pattern")?
        };
        Ok(Selection {
            retrospectives,
            group: self.group.to_owned(),
            view: self.view,
            question: self.question.to_owned(),
            show_average_line: !self.no_average_line,
            reflection: self.reflection.to_owned(),
            top: self.top,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let selection = cli.selection()?;
    let source = cli.workbook.as_ref().map(WorkbookSource::path);
    let session = Session::start(source).context("Failed to load workbook")?;

    if let Some(prompt) = session.prompt() {
        println!("{prompt}");
        return Ok(());
    }
    let Session::Ready(dashboard) = session else {
        return Ok(());
    };
    debug!(rows = dashboard.workbook().table.rows.len(), "workbook ready");

    let report = dashboard.report(&selection, cli.tab)?;
    match cli.format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
