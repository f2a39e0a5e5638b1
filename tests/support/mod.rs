use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub const LEGACY_ENTRY_CLASS: &str =
    "page-details job-candidate-list node node-jobs node-teaser view-mode-teaser";

pub fn legacy_job(id: &str, title: &str, description: &str, date: &str) -> String {
    format!(
        r#"<div class="{LEGACY_ENTRY_CLASS}">
  <div class="collapse-job page-details-job clearfix"><h3>{title}</h3></div>
  <div class="field field-name-field-job-id field-type-serial field-label-inline clearfix">{id}</div>
  <div class="row1 clearfix page-details-content content">{description}</div>
  <span class="date-display-single">{date}</span>
  <span class="lineage-item lineage-item-level-0">גליל עליון</span>
</div>"#
    )
}

pub fn page(body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"he\"><head><meta charset=\"utf-8\"><title>משרות</title></head><body>{body}</body></html>\n"
    )
}

/// Local job boards:
/// - `/a/jobs` (legacy): a Python posting on the first page, a nurse posting on page 1;
/// - `/b/jobs` (current): a Hebrew posting on the first page, page 1 is missing (404);
/// - `/broken/jobs`: every page answers 500.
pub fn spawn_job_boards() -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let addr = server.server_addr();
    let base_url = format!("http://{addr}");

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let (status, body) = match request.url() {
                "/a/jobs" => (
                    200,
                    page(&legacy_job(
                        "1001",
                        "Backend Developer",
                        "Seeking a Python Developer for data pipelines",
                        "01/02/2025",
                    )),
                ),
                "/a/jobs?page=1" => (
                    200,
                    page(&legacy_job(
                        "1002",
                        "אח/ות",
                        "משמרות לילה במחלקה פנימית",
                        "02/02/2025",
                    )),
                ),
                "/b/jobs" => (
                    200,
                    page(
                        r#"<div id="job-2001">
  <h2 class="job-title">מתכנת/ת</h2>
  <p class="job-description">מחפשים מתכנת פייתון לצוות המערכות</p>
  <span class="job-area">קצרין</span>
</div>"#,
                    ),
                ),
                url if url.starts_with("/broken/") => (500, "internal error".to_owned()),
                _ => (404, "not found".to_owned()),
            };

            let header = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"text/html; charset=utf-8"[..],
            )
            .expect("build header");
            let response = tiny_http::Response::from_string(body)
                .with_status_code(status)
                .with_header(header);
            let _ = request.respond(response);
        }
    });

    (base_url, shutdown_tx, handle)
}
