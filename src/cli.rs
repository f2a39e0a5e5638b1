use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Write logs to this file (truncated at startup) instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every listing page, write the report and optionally mail it.
    Run(RunArgs),
    /// Mail an existing report.
    Notify(NotifyArgs),
    /// Print the listing pages that `run` would fetch.
    Urls(SourceArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// YAML configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// Base URL of a job board (legacy layout). Repeat to watch several boards.
    #[arg(long)]
    pub site: Vec<String>,

    /// Listing pages per board, the unparameterized first page included.
    #[arg(long)]
    pub pages: Option<u32>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Keyword to search job descriptions for. Repeat for several keywords.
    #[arg(long)]
    pub keyword: Vec<String>,

    /// Per-request fetch timeout.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output path of the HTML report.
    #[arg(long)]
    pub out: Option<String>,

    /// Stylesheet linked from the report and inlined into the email.
    #[arg(long)]
    pub stylesheet: Option<String>,

    /// Mail the finished report to this address.
    #[arg(long)]
    pub recipient: Option<String>,
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Recipient address.
    #[arg(long)]
    pub recipient: String,

    /// Report to send.
    #[arg(long, default_value = crate::config::DEFAULT_OUTPUT)]
    pub report: String,

    /// Stylesheet inlined into the email body.
    #[arg(long, default_value = crate::config::DEFAULT_STYLESHEET)]
    pub stylesheet: String,

    /// Subject line (default: "Job listings <dd/mm/yyyy>").
    #[arg(long)]
    pub subject: Option<String>,
}
