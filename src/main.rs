use std::path::Path;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    let cli = jobwatch::cli::Cli::parse();
    jobwatch::logging::init(cli.log_file.as_deref().map(Path::new)).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        jobwatch::cli::Command::Run(args) => {
            jobwatch::pipeline::run(args).await.context("run")?;
        }
        jobwatch::cli::Command::Notify(args) => {
            jobwatch::notify::run(args).await.context("notify")?;
        }
        jobwatch::cli::Command::Urls(args) => {
            jobwatch::urls::run(args).context("urls")?;
        }
    }

    Ok(())
}
