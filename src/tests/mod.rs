use std::path::PathBuf;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::tempdir;
use tokio::sync::mpsc;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap()
}

fn tracker_options(data_file: PathBuf) -> crate::tracker::TrackerOptions {
    crate::tracker::TrackerOptions {
        data_file,
        filter: crate::filter::StatusFilter::All,
        notice_ms: crate::tracker::DEFAULT_NOTICE_MS,
    }
}

fn sample_certificate(attachment: Option<PathBuf>) -> crate::intake::NewCertificate {
    crate::intake::NewCertificate {
        title: "Kubernetes Administrator".to_string(),
        provider: "CNCF".to_string(),
        issue_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        expiry_date: NaiveDate::from_ymd_opt(2028, 1, 10).unwrap(),
        attachment,
    }
}

fn expire_later(tx: mpsc::Sender<crate::tracker::TrackerEvent>, seq: u64, after_ms: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(after_ms)).await;
        let _ = tx
            .send(crate::tracker::TrackerEvent::NoticeExpired(seq))
            .await;
    });
}

#[test]
fn seeded_store_classifies_against_a_fixed_clock() {
    let dir = tempdir().unwrap();
    let store = crate::store::CertStore::open(&dir.path().join("certificates.json")).unwrap();
    let view = crate::view::build_list_view(
        store.records(),
        crate::filter::StatusFilter::All,
        fixed_now(),
    );
    assert_eq!(view.total, 3);
    assert_eq!(view.soon_count, 1);
    let labels: Vec<_> = view.cards.iter().map(|c| c.status_label).collect();
    assert_eq!(labels, vec!["Active", "Active", "Expiring Soon"]);
    assert_eq!(view.cards[2].remaining, "9 days left");
}

#[tokio::test]
async fn submitted_records_survive_a_reopen() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("certificates.json");
    let mut tracker = crate::tracker::Tracker::new(tracker_options(data_file.clone())).unwrap();
    let index = tracker.submit(sample_certificate(None)).await.unwrap();
    assert_eq!(index, 3);

    let reopened = crate::store::CertStore::open(&data_file).unwrap();
    assert_eq!(reopened.len(), 4);
    assert_eq!(reopened.get(3).unwrap().title, "Kubernetes Administrator");
    assert!(!reopened.get(3).unwrap().has_attachment());
}

#[tokio::test]
async fn attachments_round_trip_through_the_data_uri() {
    let dir = tempdir().unwrap();
    let attachment = dir.path().join("transcript.pdf");
    std::fs::write(&attachment, b"%PDF-1.4 sample transcript").unwrap();

    let data_file = dir.path().join("certificates.json");
    let mut tracker = crate::tracker::Tracker::new(tracker_options(data_file.clone())).unwrap();
    tracker
        .submit(sample_certificate(Some(attachment)))
        .await
        .unwrap();

    let reopened = crate::store::CertStore::open(&data_file).unwrap();
    let record = reopened.get(3).unwrap();
    assert!(record.has_attachment());
    let encoded = record
        .file_url
        .strip_prefix("data:application/pdf;base64,")
        .unwrap();
    assert_eq!(
        STANDARD.decode(encoded).unwrap(),
        b"%PDF-1.4 sample transcript"
    );
}

#[tokio::test]
async fn notice_timers_clear_only_their_own_notice() {
    let dir = tempdir().unwrap();
    let mut tracker =
        crate::tracker::Tracker::new(tracker_options(dir.path().join("certificates.json")))
            .unwrap();
    let (tx, mut rx) = mpsc::channel::<crate::tracker::TrackerEvent>(4);

    let first = tracker.show_notice("Certificate saved");
    expire_later(tx.clone(), first, 10);
    let second = tracker.show_notice("Certificate saved");
    expire_later(tx.clone(), second, 50);
    drop(tx);

    let event = rx.recv().await.unwrap();
    tracker.apply(event).await.unwrap();
    assert!(tracker.notice().is_some());
    assert_eq!(tracker.notice().unwrap().seq, second);

    let event = rx.recv().await.unwrap();
    tracker.apply(event).await.unwrap();
    assert!(tracker.notice().is_none());
}

#[tokio::test]
async fn fresh_expired_records_land_under_the_expired_filter() {
    let dir = tempdir().unwrap();
    let mut tracker =
        crate::tracker::Tracker::new(tracker_options(dir.path().join("certificates.json")))
            .unwrap();
    let mut input = sample_certificate(None);
    input.expiry_date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
    let index = tracker.submit(input).await.unwrap();

    let expired = crate::view::build_list_view(
        tracker.store().records(),
        crate::filter::StatusFilter::Expired,
        fixed_now(),
    );
    assert!(expired.cards.iter().any(|c| c.index == index));

    let soon = crate::view::build_list_view(
        tracker.store().records(),
        crate::filter::StatusFilter::Soon,
        fixed_now(),
    );
    assert!(soon.cards.iter().all(|c| c.index != index));

    let active = crate::view::build_list_view(
        tracker.store().records(),
        crate::filter::StatusFilter::Active,
        fixed_now(),
    );
    assert!(active.cards.iter().all(|c| c.index != index));
}

#[test]
fn json_view_carries_counts_and_positions() {
    let records = crate::store::seed_records();
    let view =
        crate::view::build_list_view(&records, crate::filter::StatusFilter::Soon, fixed_now());
    let value: serde_json::Value =
        serde_json::from_slice(&crate::view::render_json(&view)).unwrap();
    assert_eq!(value["filter"], "soon");
    assert_eq!(value["total"], 3);
    assert_eq!(value["soon_count"], 1);
    assert_eq!(value["cards"][0]["index"], 2);
    assert_eq!(value["cards"][0]["status"], "soon");
    assert_eq!(value["cards"][0]["title"], "Azure Fundamentals");
}

#[test]
fn html_page_embeds_records_and_the_initial_filter() {
    let records = crate::store::seed_records();
    let html = String::from_utf8(crate::view::render_html(
        &records,
        crate::filter::StatusFilter::Soon,
    ))
    .unwrap();
    assert!(html.contains(r#"<script type="application/json" id="certificates-data">"#));
    assert!(html.contains("\"fileUrl\""));
    assert!(html.contains("let activeFilter = 'soon';"));
    assert!(html.contains("MY CERTIFICATIONS"));
    assert!(html.contains("No certificates found for this filter."));
    for chip in ["all", "expired", "soon", "active"] {
        assert!(html.contains(&format!(r#"data-filter="{chip}""#)));
    }
}

#[test]
fn closing_script_tags_cannot_break_the_data_block() {
    let mut records = crate::store::seed_records();
    records[0].title = "Totally </script> legit".to_string();
    let html = String::from_utf8(crate::view::render_html(
        &records,
        crate::filter::StatusFilter::All,
    ))
    .unwrap();
    assert!(!html.contains("Totally </script> legit"));
    assert!(html.contains(r"<\/script>"));
}

#[test]
fn config_yaml_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "default_filter: soon\nnotice_ms: 1500\nno_color: true\n").unwrap();
    let cfg = crate::config::load_config(&path, false).unwrap();
    assert_eq!(cfg.default_filter.as_deref(), Some("soon"));
    assert_eq!(cfg.notice_ms, Some(1500));
    assert_eq!(cfg.no_color, Some(true));

    let missing = dir.path().join("absent.yml");
    let fallback = crate::config::load_config(&missing, true).unwrap();
    assert!(fallback.default_filter.is_none());
    assert!(crate::config::load_config(&missing, false).is_err());
}

#[test]
fn default_config_template_stays_parseable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yml");
    crate::config::ensure_default_config_file(&path).unwrap();
    let cfg = crate::config::load_config(&path, false).unwrap();
    assert_eq!(cfg.default_filter.as_deref(), Some("all"));
    assert_eq!(cfg.notice_ms, Some(3000));
    assert_eq!(cfg.no_color, Some(false));
}
