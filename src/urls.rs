use std::io::Write as _;

use anyhow::Context as _;

use crate::cli::SourceArgs;
use crate::config::Config;

pub fn run(args: SourceArgs) -> anyhow::Result<()> {
    let config = Config::from_source_args(&args).context("load configuration")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let bases: Vec<&str> = config.sites.iter().map(|site| site.url.as_str()).collect();
    for url in expand(&bases, config.pages) {
        writeln!(out, "{url}").context("write url")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

/// Expands every base URL into its listing pages: the base itself, then `?page=1` up to
/// `?page={pages - 1}`.
pub fn expand<S: AsRef<str>>(base_urls: &[S], pages: u32) -> Vec<String> {
    let mut urls = Vec::with_capacity(base_urls.len() * pages as usize);
    for base in base_urls {
        urls.extend(paged(base.as_ref(), pages));
    }
    urls
}

fn paged(base: &str, pages: u32) -> Vec<String> {
    if pages == 0 {
        return Vec::new();
    }

    let mut urls = vec![base.to_owned()];
    for page in 1..pages {
        urls.push(format!("{base}?page={page}"));
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_base_expands_to_ten_pages() {
        let urls = expand(&["https://a.x/jobs"], 10);

        assert_eq!(urls.len(), 10);
        assert_eq!(urls[0], "https://a.x/jobs");
        assert_eq!(urls[1], "https://a.x/jobs?page=1");
        assert_eq!(urls[9], "https://a.x/jobs?page=9");
    }

    #[test]
    fn base_order_is_preserved() {
        let urls = expand(&["https://a.x/jobs", "https://b.x/jobs", "https://c.x/jobs"], 4);

        assert_eq!(urls.len(), 12);
        assert!(urls[..4].iter().all(|url| url.starts_with("https://a.x/")));
        assert!(urls[4..8].iter().all(|url| url.starts_with("https://b.x/")));
        assert!(urls[8..].iter().all(|url| url.starts_with("https://c.x/")));
        assert_eq!(urls[4], "https://b.x/jobs");
    }

    #[test]
    fn tiny_windows() {
        assert!(expand(&["https://a.x/jobs"], 0).is_empty());
        assert_eq!(expand(&["https://a.x/jobs"], 1), vec!["https://a.x/jobs"]);
    }

    #[test]
    fn malformed_urls_are_passed_through() {
        let urls = expand(&["not a url"], 2);
        assert_eq!(urls, vec!["not a url", "not a url?page=1"]);
    }
}
