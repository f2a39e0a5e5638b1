use scraper::{ElementRef, Html, Selector};

use crate::formats::{JobMap, JobRecord, NOT_AVAILABLE};
use crate::layout::{IdSource, LayoutRules};

/// Parses one listing page into job records.
///
/// Fields the markup does not provide are filled with [`NOT_AVAILABLE`]; a page without any
/// entries yields an empty map. Entries nested inside another entry are skipped so that only
/// top-level postings are reported.
pub fn extract_jobs(html: &str, rules: &LayoutRules) -> JobMap {
    let document = Html::parse_document(html);

    let mut jobs = JobMap::new();
    for entry in document.select(&rules.entry) {
        if is_nested_entry(&entry, &rules.entry) {
            continue;
        }
        let record = extract_entry(&entry, rules);
        jobs.insert(record.id.clone(), record);
    }

    jobs
}

fn extract_entry(entry: &ElementRef<'_>, rules: &LayoutRules) -> JobRecord {
    let id = match &rules.id {
        IdSource::Text(selector) => field_text(entry, selector),
        IdSource::Attribute { name, prefix } => entry
            .value()
            .attr(name)
            .map(str::trim)
            .map(|value| value.strip_prefix(prefix).unwrap_or(value))
            .filter(|value| !value.is_empty())
            .unwrap_or(NOT_AVAILABLE)
            .to_owned(),
    };

    JobRecord {
        id,
        title: field_text(entry, &rules.title),
        description: field_text(entry, &rules.description),
        date: field_text(entry, &rules.date),
        area: field_text(entry, &rules.area),
    }
}

fn field_text(entry: &ElementRef<'_>, selector: &Selector) -> String {
    entry
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

fn is_nested_entry(entry: &ElementRef<'_>, selector: &Selector) -> bool {
    entry
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SiteLayout;

    const LEGACY_ENTRY_CLASS: &str =
        "page-details job-candidate-list node node-jobs node-teaser view-mode-teaser";

    fn legacy_entry(id: &str, date: Option<&str>, description: &str) -> String {
        let date = date
            .map(|date| format!(r#"<span class="date-display-single">{date}</span>"#))
            .unwrap_or_default();
        format!(
            r#"<div class="{LEGACY_ENTRY_CLASS}">
  <div class="collapse-job page-details-job clearfix"><h3> מפתח/ת תוכנה </h3></div>
  <div class="field field-name-field-job-id field-type-serial field-label-inline clearfix">{id}</div>
  <div class="row1 clearfix page-details-content content">
    {description}
  </div>
  {date}
  <span class="lineage-item lineage-item-level-0">קצרין</span>
</div>"#
        )
    }

    #[test]
    fn legacy_layout_extracts_all_fields() -> anyhow::Result<()> {
        let html = format!(
            "<html><body>{}</body></html>",
            legacy_entry("1234", Some("01/02/2025"), "Seeking a Python Developer")
        );

        let jobs = extract_jobs(&html, &SiteLayout::Legacy.rules()?);
        let job = jobs.get("1234").expect("job 1234");

        assert_eq!(job.title, "מפתח/ת תוכנה");
        assert_eq!(job.description, "Seeking a Python Developer");
        assert_eq!(job.date, "01/02/2025");
        assert_eq!(job.area, "קצרין");
        Ok(())
    }

    #[test]
    fn missing_date_defaults_to_sentinel() -> anyhow::Result<()> {
        let html = format!(
            "<html><body>{}</body></html>",
            legacy_entry("77", None, "מחפשים מתכנת")
        );

        let jobs = extract_jobs(&html, &SiteLayout::Legacy.rules()?);
        let job = jobs.get("77").expect("job 77");

        assert_eq!(job.date, NOT_AVAILABLE);
        assert_eq!(job.description, "מחפשים מתכנת");
        assert_eq!(job.area, "קצרין");
        Ok(())
    }

    #[test]
    fn page_without_entries_yields_empty_map() -> anyhow::Result<()> {
        let jobs = extract_jobs(
            "<html><body><p>nothing</p></body></html>",
            &SiteLayout::Legacy.rules()?,
        );
        assert!(jobs.is_empty());

        let jobs = extract_jobs("", &SiteLayout::Current.rules()?);
        assert!(jobs.is_empty());
        Ok(())
    }

    #[test]
    fn current_layout_reads_id_from_attribute() -> anyhow::Result<()> {
        let html = r#"<html><body>
<div id="job-501">
  <h2 class="job-title">Backend developer</h2>
  <p class="job-description">C# and .NET services</p>
  <span class="job-area">Haifa</span>
</div>
<div id="job-502">
  <h2 class="job-title">Nurse</h2>
  <p class="job-description">Night shifts</p>
  <span class="job-date">03/03/2025</span>
</div>
</body></html>"#;

        let jobs = extract_jobs(html, &SiteLayout::Current.rules()?);

        assert_eq!(jobs.len(), 2);
        let developer = jobs.get("501").expect("job 501");
        assert_eq!(developer.title, "Backend developer");
        assert_eq!(developer.date, NOT_AVAILABLE);
        assert_eq!(developer.area, "Haifa");
        let nurse = jobs.get("502").expect("job 502");
        assert_eq!(nurse.area, NOT_AVAILABLE);
        assert_eq!(nurse.date, "03/03/2025");
        Ok(())
    }

    #[test]
    fn nested_entries_are_not_reported_twice() -> anyhow::Result<()> {
        let html = r#"<div id="job-1"><p class="job-description">outer</p>
<div id="job-2"><p class="job-description">inner</p></div></div>"#;

        let jobs = extract_jobs(html, &SiteLayout::Current.rules()?);

        assert_eq!(jobs.keys().collect::<Vec<_>>(), vec!["1"]);
        Ok(())
    }

    #[test]
    fn duplicate_ids_keep_the_last_entry() -> anyhow::Result<()> {
        let html = format!(
            "{}{}",
            legacy_entry("9", None, "first"),
            legacy_entry("9", None, "second")
        );

        let jobs = extract_jobs(&html, &SiteLayout::Legacy.rules()?);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs["9"].description, "second");
        Ok(())
    }
}
