use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tokio::io::AsyncWriteExt as _;
use tokio::sync::Mutex;

use crate::formats::JobMap;

const HIGHLIGHT_OPEN: &str = r#"<span style="color:red; font-weight:bold;">"#;
const HIGHLIGHT_CLOSE: &str = "</span>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// `Rtl` as soon as the text contains a character from the Hebrew block.
pub fn text_direction(text: &str) -> TextDirection {
    if text.chars().any(|ch| ('\u{0590}'..='\u{05FF}').contains(&ch)) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Wraps every literal keyword occurrence in a highlight span and HTML-escapes the rest.
///
/// Matches are computed against the original text only. Keywords are tried in order and an
/// occurrence that overlaps an already claimed span is dropped, so inserted markup is never
/// matched again.
pub fn highlight<S: AsRef<str>>(text: &str, keywords: &[S]) -> String {
    // Claimed spans keyed by start. They never overlap, so the closest span starting before
    // `end` is the only one that can collide with `start..end`.
    let mut spans: BTreeMap<usize, usize> = BTreeMap::new();
    for keyword in keywords {
        let keyword = keyword.as_ref();
        if keyword.is_empty() {
            continue;
        }
        for (start, matched) in text.match_indices(keyword) {
            let end = start + matched.len();
            let overlaps = spans
                .range(..end)
                .next_back()
                .is_some_and(|(_, &claimed_end)| claimed_end > start);
            if !overlaps {
                spans.insert(start, end);
            }
        }
    }

    let mut out = String::with_capacity(text.len() + spans.len() * 64);
    let mut cursor = 0;
    for (start, end) in spans {
        out.push_str(&html_escape(&text[cursor..start]));
        out.push_str(HIGHLIGHT_OPEN);
        out.push_str(&html_escape(&text[start..end]));
        out.push_str(HIGHLIGHT_CLOSE);
        cursor = end;
    }
    out.push_str(&html_escape(&text[cursor..]));
    out
}

pub fn render_header(stylesheet_href: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="he">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Job Listings</title>
  <link rel="stylesheet" href="{}">
</head>
<body>
"#,
        html_escape(stylesheet_href)
    )
}

pub fn render_footer() -> &'static str {
    "</body>\n</html>\n"
}

/// One self-contained report section for the matches found on `url`.
pub fn render_section<S: AsRef<str>>(url: &str, keywords: &[S], jobs: &JobMap) -> String {
    let url = html_escape(url);
    let keyword_list = keywords
        .iter()
        .map(|keyword| keyword.as_ref())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    out.push_str("<section>\n");
    out.push_str(&format!(
        "  <h1>Job Listings from URL: <a href=\"{url}\" target=\"_blank\">{url}</a></h1>\n"
    ));
    out.push_str(&format!(
        "  <h2>Keywords: {}</h2>\n",
        html_escape(&keyword_list)
    ));

    for (id, job) in jobs {
        let direction = text_direction(&job.description);
        out.push_str(&format!(
            "  <div style=\"direction: {}; margin-bottom: 20px;\">\n",
            direction.as_str()
        ));
        out.push_str(&format!(
            "    <h3><strong>{}</strong></h3>\n",
            html_escape(&job.title)
        ));
        out.push_str(&format!("    <h4>{}</h4>\n", html_escape(id)));
        out.push_str(&format!(
            "    <h4><strong>מיקום :{}</strong></h4>\n",
            html_escape(&job.area)
        ));
        out.push_str(&format!(
            "    <h4><strong>תאריך :{}</strong></h4>\n",
            html_escape(&job.date)
        ));
        out.push_str(&format!(
            "    <p>{}</p>\n",
            highlight(&job.description, keywords)
        ));
        out.push_str("  </div>\n");
    }

    out.push_str("</section>\n");
    out
}

/// The cumulative report file of one run.
///
/// Creating the writer truncates the file and writes the document head, so the head always
/// precedes every section. Appends are serialized, each section lands in one piece.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl ReportWriter {
    pub async fn create(path: impl Into<PathBuf>, stylesheet_href: &str) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create report dir: {}", parent.display()))?;
        }

        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("create report: {}", path.display()))?;
        file.write_all(render_header(stylesheet_href).as_bytes())
            .await
            .with_context(|| format!("write report header: {}", path.display()))?;
        file.flush().await.context("flush report header")?;
        tracing::info!(path = %path.display(), "report created");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, fragment: &str) -> anyhow::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(fragment.as_bytes())
            .await
            .with_context(|| format!("append to report: {}", self.path.display()))?;
        file.flush().await.context("flush report")?;
        Ok(())
    }

    pub async fn finish(&self) -> anyhow::Result<()> {
        let mut file = self.file.lock().await;
        file.write_all(render_footer().as_bytes())
            .await
            .with_context(|| format!("write report footer: {}", self.path.display()))?;
        file.flush().await.context("flush report footer")?;
        file.sync_all().await.context("sync report")?;
        Ok(())
    }
}

pub(crate) fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
