use crate::formats::JobMap;

/// Keeps the jobs whose description contains at least one keyword, ignoring case.
///
/// Keywords match as plain substrings exactly as configured, surrounding whitespace included,
/// so `developer` also matches `developers` while `net ` does not match `network`. Blank
/// keywords are ignored and an empty keyword list matches nothing.
pub fn filter_jobs<S: AsRef<str>>(jobs: &JobMap, keywords: &[S]) -> JobMap {
    let needles: Vec<String> = keywords
        .iter()
        .map(|keyword| keyword.as_ref())
        .filter(|keyword| !keyword.trim().is_empty())
        .map(str::to_lowercase)
        .collect();
    if needles.is_empty() {
        return JobMap::new();
    }

    jobs.iter()
        .filter(|(_, job)| {
            let description = job.description.to_lowercase();
            needles.iter().any(|needle| description.contains(needle.as_str()))
        })
        .map(|(id, job)| (id.clone(), job.clone()))
        .collect()
}
