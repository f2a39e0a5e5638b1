use std::path::Path;

use anyhow::Context as _;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor};

use crate::cli::NotifyArgs;

/// Result of a delivery attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Nothing worth sending: the report was missing or empty.
    Skipped,
}

/// Delivers a finished report. Called once, after the report file is complete.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        report_path: &Path,
        stylesheet_path: &Path,
    ) -> anyhow::Result<Delivery>;
}

pub async fn run(args: NotifyArgs) -> anyhow::Result<()> {
    let notifier = SmtpNotifier::from_env().context("load email settings")?;
    let subject = args.subject.unwrap_or_else(default_subject);
    let delivery = notifier
        .notify(
            &args.recipient,
            &subject,
            Path::new(&args.report),
            Path::new(&args.stylesheet),
        )
        .await
        .context("send report")?;
    if delivery == Delivery::Sent {
        tracing::info!(recipient = %args.recipient, "report delivered");
    }
    Ok(())
}

pub fn default_subject() -> String {
    format!("Job listings {}", chrono::Local::now().format("%d/%m/%Y"))
}

/// Hands the report to `notifier`. A delivery failure is logged and swallowed; the report
/// on disk stays as it is.
pub async fn deliver(
    notifier: &dyn Notifier,
    recipient: &str,
    subject: &str,
    report_path: &Path,
    stylesheet_path: &Path,
) {
    match notifier
        .notify(recipient, subject, report_path, stylesheet_path)
        .await
    {
        Ok(Delivery::Sent) => tracing::info!(recipient, "report delivered"),
        Ok(Delivery::Skipped) => tracing::info!(recipient, "report delivery skipped"),
        Err(err) => tracing::error!(recipient, ?err, "report delivery failed"),
    }
}

/// Email body for a report: the report's `<body>` contents under an inline `<style>` block.
pub fn compose_email_html(report_html: &str, css: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<style>\n{css}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        body_contents(report_html).trim()
    )
}

fn body_contents(html: &str) -> &str {
    // ASCII lowercasing keeps byte offsets valid for `html`.
    let lower = html.to_ascii_lowercase();
    let Some(open) = lower.find("<body") else {
        return html;
    };
    let Some(content_start) = lower[open..].find('>').map(|end| open + end + 1) else {
        return html;
    };
    let content_end = lower
        .rfind("</body>")
        .filter(|&close| close >= content_start)
        .unwrap_or(html.len());
    &html[content_start..content_end]
}

#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .finish_non_exhaustive()
    }
}

impl SmtpSettings {
    /// Reads `SMTP_SERVER`, `SMTP_PORT`, `EMAIL_SENDER` and `EMAIL_PASSWORD`, after loading a
    /// `.env` file when one is present.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let server = required_env("SMTP_SERVER")?;
        let port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid SMTP_PORT={raw:?}"))?,
            Err(_) => 587,
        };
        let sender = required_env("EMAIL_SENDER")?;
        let password = required_env("EMAIL_PASSWORD")?;

        Ok(Self {
            server,
            port,
            sender,
            password,
        })
    }
}

fn required_env(name: &str) -> anyhow::Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} is required"))?;
    let value = value.trim().to_owned();
    if value.is_empty() {
        anyhow::bail!("{name} is empty");
    }
    Ok(value)
}

/// Sends the report as an HTML email over STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(SmtpSettings::from_env()?))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        report_path: &Path,
        stylesheet_path: &Path,
    ) -> anyhow::Result<Delivery> {
        let Some(body) = email_body(report_path, stylesheet_path).await else {
            return Ok(Delivery::Skipped);
        };

        let from: Mailbox = self
            .settings
            .sender
            .parse()
            .with_context(|| format!("parse sender address: {}", self.settings.sender))?;
        let to: Mailbox = recipient
            .parse()
            .with_context(|| format!("parse recipient address: {recipient}"))?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .context("build email message")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)
            .with_context(|| format!("configure SMTP relay: {}", self.settings.server))?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.sender.clone(),
                self.settings.password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .with_context(|| format!("send email via {}:{}", self.settings.server, self.settings.port))?;

        Ok(Delivery::Sent)
    }
}

/// Reads the report and stylesheet and composes the email body. `None` when the report is
/// missing or empty; a missing stylesheet only drops the styling.
async fn email_body(report_path: &Path, stylesheet_path: &Path) -> Option<String> {
    let Some(report_html) = read_optional(report_path).await else {
        tracing::error!(path = %report_path.display(), "report is missing; email not sent");
        return None;
    };
    if report_html.trim().is_empty() {
        tracing::error!(path = %report_path.display(), "report is empty; email not sent");
        return None;
    }
    let css = read_optional(stylesheet_path).await.unwrap_or_else(|| {
        tracing::warn!(path = %stylesheet_path.display(), "stylesheet is missing; sending unstyled");
        String::new()
    });
    Some(compose_email_html(&report_html, &css))
}

async fn read_optional(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Some(contents),
        Err(err) => {
            tracing::debug!(path = %path.display(), ?err, "read failed");
            None
        }
    }
}
