use anyhow::Context as _;
use scraper::Selector;
use serde::Deserialize;

/// Markup family of a job board. Chosen per site in configuration, never guessed from the
/// fetched page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteLayout {
    /// Drupal teaser markup: every field is located by CSS class and the job id is the text
    /// of a dedicated field element.
    #[default]
    Legacy,
    /// Entries carry an `id="job-<id>"` attribute; fields use `job-*` classes.
    Current,
}

#[derive(Debug, Clone)]
pub enum IdSource {
    Text(Selector),
    Attribute {
        name: &'static str,
        prefix: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct LayoutRules {
    pub entry: Selector,
    pub id: IdSource,
    pub title: Selector,
    pub description: Selector,
    pub date: Selector,
    pub area: Selector,
}

impl SiteLayout {
    pub fn rules(self) -> anyhow::Result<LayoutRules> {
        match self {
            SiteLayout::Legacy => Ok(LayoutRules {
                entry: selector(
                    "div.page-details.job-candidate-list.node.node-jobs.node-teaser.view-mode-teaser",
                )?,
                id: IdSource::Text(selector("div.field-name-field-job-id")?),
                title: selector("div.collapse-job.page-details-job h3")?,
                description: selector("div.row1.page-details-content.content")?,
                date: selector("span.date-display-single")?,
                area: selector("span.lineage-item.lineage-item-level-0")?,
            }),
            SiteLayout::Current => Ok(LayoutRules {
                entry: selector(r#"div[id^="job-"]"#)?,
                id: IdSource::Attribute {
                    name: "id",
                    prefix: "job-",
                },
                title: selector(".job-title")?,
                description: selector(".job-description")?,
                date: selector(".job-date")?,
                area: selector(".job-area")?,
            }),
        }
    }
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css)
        .map_err(|err| anyhow::anyhow!("{err}"))
        .with_context(|| format!("parse selector: {css}"))
}
