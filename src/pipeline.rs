use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use tokio::task::JoinSet;
use tracing::Instrument as _;

use crate::cli::RunArgs;
use crate::config::Config;
use crate::extract::extract_jobs;
use crate::fetch::PageFetcher;
use crate::filter::filter_jobs;
use crate::formats::Site;
use crate::layout::LayoutRules;
use crate::notify::{Notifier, SmtpNotifier};
use crate::report::{ReportWriter, render_section};
use crate::urls::expand;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub sites: Vec<Site>,
    pub keywords: Vec<String>,
    pub pages: u32,
    pub timeout: Duration,
    pub output: PathBuf,
    pub stylesheet_href: String,
}

/// What happened to a single listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    FetchFailed,
    NoMatches { extracted: usize },
    Appended { extracted: usize, matched: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub urls: usize,
    pub fetch_failures: usize,
    pub task_failures: usize,
    pub pages_with_matches: usize,
    pub matched_jobs: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::FetchFailed => self.fetch_failures += 1,
            PageOutcome::NoMatches { .. } => {}
            PageOutcome::Appended { matched, .. } => {
                self.pages_with_matches += 1;
                self.matched_jobs += matched;
            }
        }
    }
}

pub async fn run(args: RunArgs) -> anyhow::Result<RunSummary> {
    let config = Config::from_run_args(&args).context("load configuration")?;
    let summary = run_pipeline(&config.pipeline()).await?;

    if let Some(recipient) = config.recipient.as_deref() {
        match SmtpNotifier::from_env() {
            Ok(notifier) => {
                notify_report(&notifier, recipient, &config).await;
            }
            Err(err) => tracing::error!(?err, "email settings unavailable; report not sent"),
        }
    }

    Ok(summary)
}

pub async fn notify_report(notifier: &dyn Notifier, recipient: &str, config: &Config) {
    crate::notify::deliver(
        notifier,
        recipient,
        &crate::notify::default_subject(),
        &config.output,
        &config.stylesheet,
    )
    .await;
}

/// Fetches every listing page concurrently and collects the matching jobs into the report.
///
/// The report is truncated before any page is fetched and closed after the last task has
/// finished. A failing page is logged and counted; it never cancels the other pages. Only
/// report I/O on creation or completion fails the run.
pub async fn run_pipeline(config: &PipelineConfig) -> anyhow::Result<RunSummary> {
    let report = Arc::new(
        ReportWriter::create(&config.output, &config.stylesheet_href)
            .await
            .context("create report")?,
    );
    let fetcher = PageFetcher::new(config.timeout)?;
    let keywords: Arc<[String]> = config.keywords.clone().into();

    let mut pages = Vec::new();
    for site in &config.sites {
        let rules = site
            .layout
            .rules()
            .with_context(|| format!("compile {:?} layout for {}", site.layout, site.url))?;
        let rules = Arc::new(rules);
        for url in expand(std::slice::from_ref(&site.url), config.pages) {
            pages.push((url, Arc::clone(&rules)));
        }
    }
    tracing::info!(
        sites = config.sites.len(),
        urls = pages.len(),
        keywords = keywords.len(),
        "pipeline: start"
    );

    let mut tasks = JoinSet::new();
    for (url, rules) in pages {
        let fetcher = fetcher.clone();
        let report = Arc::clone(&report);
        let keywords = Arc::clone(&keywords);
        let span = tracing::info_span!("page", url = %url);
        tasks.spawn(
            async move { process_page(&fetcher, &report, &url, &rules, &keywords).await }
                .instrument(span),
        );
    }

    let mut summary = RunSummary::default();
    while let Some(joined) = tasks.join_next().await {
        summary.urls += 1;
        match joined {
            Ok(Ok(outcome)) => summary.record(outcome),
            Ok(Err(err)) => {
                tracing::error!(?err, "page task failed");
                summary.task_failures += 1;
            }
            Err(err) => {
                tracing::error!(%err, "page task aborted");
                summary.task_failures += 1;
            }
        }
    }

    report.finish().await.context("finish report")?;
    tracing::info!(
        path = %report.path().display(),
        urls = summary.urls,
        fetch_failures = summary.fetch_failures,
        task_failures = summary.task_failures,
        pages_with_matches = summary.pages_with_matches,
        matched_jobs = summary.matched_jobs,
        "pipeline: done"
    );

    Ok(summary)
}

async fn process_page(
    fetcher: &PageFetcher,
    report: &ReportWriter,
    url: &str,
    rules: &LayoutRules,
    keywords: &[String],
) -> anyhow::Result<PageOutcome> {
    let html = match fetcher.fetch(url).await {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(?err, "fetch failed; page skipped");
            return Ok(PageOutcome::FetchFailed);
        }
    };

    let jobs = extract_jobs(&html, rules);
    let matched = filter_jobs(&jobs, keywords);
    if matched.is_empty() {
        tracing::info!(extracted = jobs.len(), "no matching jobs");
        return Ok(PageOutcome::NoMatches {
            extracted: jobs.len(),
        });
    }

    let section = render_section(url, keywords, &matched);
    report.append(&section).await.context("append report section")?;
    tracing::info!(
        extracted = jobs.len(),
        matched = matched.len(),
        "matching jobs added to report"
    );

    Ok(PageOutcome::Appended {
        extracted: jobs.len(),
        matched: matched.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_outcomes() {
        let mut summary = RunSummary::default();
        summary.record(PageOutcome::FetchFailed);
        summary.record(PageOutcome::NoMatches { extracted: 3 });
        summary.record(PageOutcome::Appended {
            extracted: 4,
            matched: 2,
        });
        summary.record(PageOutcome::Appended {
            extracted: 1,
            matched: 1,
        });

        assert_eq!(summary.fetch_failures, 1);
        assert_eq!(summary.pages_with_matches, 2);
        assert_eq!(summary.matched_jobs, 3);
    }
}
