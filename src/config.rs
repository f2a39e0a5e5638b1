use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::Deserialize;

use crate::cli::{RunArgs, SourceArgs};
use crate::formats::Site;
use crate::pipeline::PipelineConfig;

pub const DEFAULT_SITES: &[&str] = &[
    "https://www.mcmc.org.il/he/jobs",
    "https://taasuka.galil-elion.org.il/he/jobs",
    "https://www.mwg.org.il/he/jobs",
    "https://www.mmk.org.il/he/jobs",
];

// Misspellings are intentional: the boards' own search does not normalize them.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "תוכנה", "c#", "PAYTHON", ".net", "python", "developer", "Pyton", "phyton", "פייתון",
    "פיתון", "Python", "C#",
];

pub const DEFAULT_PAGES: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OUTPUT: &str = "jobs_output.html";
pub const DEFAULT_STYLESHEET: &str = "styles.css";

/// Run configuration. Every field is optional in the YAML file and falls back to the
/// built-in monitoring setup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sites: Vec<Site>,
    pub keywords: Vec<String>,
    pub pages: u32,
    pub timeout_secs: u64,
    pub output: PathBuf,
    pub stylesheet: PathBuf,
    pub recipient: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sites: DEFAULT_SITES.iter().map(|url| Site::legacy(*url)).collect(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_owned()).collect(),
            pages: DEFAULT_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            stylesheet: PathBuf::from(DEFAULT_STYLESHEET),
            recipient: None,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parse config: {}", path.display()))?;
        Ok(config)
    }

    pub fn from_source_args(args: &SourceArgs) -> anyhow::Result<Self> {
        let mut config = Self::load(args.config.as_deref().map(Path::new))?;
        config.apply_source_args(args);
        Ok(config)
    }

    pub fn from_run_args(args: &RunArgs) -> anyhow::Result<Self> {
        let mut config = Self::from_source_args(&args.source)?;

        if !args.keyword.is_empty() {
            config.keywords = args.keyword.clone();
        }
        if let Some(timeout_secs) = args.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(out) = &args.out {
            config.output = PathBuf::from(out);
        }
        if let Some(stylesheet) = &args.stylesheet {
            config.stylesheet = PathBuf::from(stylesheet);
        }
        if let Some(recipient) = &args.recipient {
            config.recipient = Some(recipient.clone());
        }

        Ok(config)
    }

    fn apply_source_args(&mut self, args: &SourceArgs) {
        if !args.site.is_empty() {
            self.sites = args.site.iter().map(Site::legacy).collect();
        }
        if let Some(pages) = args.pages {
            self.pages = pages;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            sites: self.sites.clone(),
            keywords: self.keywords.clone(),
            pages: self.pages,
            timeout: self.timeout(),
            output: self.output.clone(),
            stylesheet_href: self.stylesheet.to_string_lossy().to_string(),
        }
    }
}
