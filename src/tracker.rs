use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::config;
use crate::filter::StatusFilter;
use crate::intake::{self, IntakeError, NewCertificate};
use crate::store::{CertStore, StoreError};
use crate::view::{self, DetailView, ListView};

pub const DEFAULT_NOTICE_MS: u64 = 3000;

#[derive(Clone, Debug)]
pub struct TrackerOptions {
    pub data_file: PathBuf,
    pub filter: StatusFilter,
    pub notice_ms: u64,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            data_file: config::default_data_path()
                .unwrap_or_else(|| PathBuf::from("certificates.json")),
            filter: StatusFilter::All,
            notice_ms: DEFAULT_NOTICE_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("store: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("intake: {source}")]
    Intake {
        #[from]
        source: IntakeError,
    },

    #[error("no record at index {index} (store holds {len})")]
    UnknownIndex { index: usize, len: usize },
}

#[derive(Clone, Debug)]
pub enum TrackerEvent {
    Filter(StatusFilter),
    Open(usize),
    CloseDetail,
    Submit(NewCertificate),
    NoticeExpired(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub seq: u64,
}

#[derive(Debug)]
pub struct Tracker {
    store: CertStore,
    filter: StatusFilter,
    detail: Option<usize>,
    notice: Option<Notice>,
    notice_seq: u64,
    notice_ms: u64,
}

impl Tracker {
    pub fn new(options: TrackerOptions) -> Result<Self, TrackerError> {
        let store = CertStore::open(&options.data_file)?;
        Ok(Self {
            store,
            filter: options.filter,
            detail: None,
            notice: None,
            notice_seq: 0,
            notice_ms: options.notice_ms,
        })
    }

    pub fn store(&self) -> &CertStore {
        &self.store
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_ms)
    }

    pub async fn apply(&mut self, event: TrackerEvent) -> Result<(), TrackerError> {
        match event {
            TrackerEvent::Filter(filter) => {
                self.filter = filter;
                Ok(())
            }
            TrackerEvent::Open(index) => {
                if index >= self.store.len() {
                    return Err(TrackerError::UnknownIndex {
                        index,
                        len: self.store.len(),
                    });
                }
                self.detail = Some(index);
                Ok(())
            }
            TrackerEvent::CloseDetail => {
                self.detail = None;
                Ok(())
            }
            TrackerEvent::Submit(input) => self.submit(input).await.map(|_| ()),
            TrackerEvent::NoticeExpired(seq) => {
                self.dismiss_notice(seq);
                Ok(())
            }
        }
    }

    pub async fn submit(&mut self, input: NewCertificate) -> Result<usize, TrackerError> {
        let record = intake::build_record(input).await?;
        let index = self.store.append(record)?;
        self.show_notice("Certificate saved");
        Ok(index)
    }

    pub fn show_notice(&mut self, text: &str) -> u64 {
        self.notice_seq += 1;
        self.notice = Some(Notice {
            text: text.to_string(),
            seq: self.notice_seq,
        });
        self.notice_seq
    }

    pub fn dismiss_notice(&mut self, seq: u64) -> bool {
        match &self.notice {
            Some(notice) if notice.seq == seq => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    pub fn list_view(&self) -> ListView {
        view::build_list_view(self.store.records(), self.filter, Utc::now())
    }

    pub fn detail_view(&self) -> Option<DetailView> {
        view::build_detail_view(self.store.records(), self.detail?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn options(dir: &std::path::Path) -> TrackerOptions {
        TrackerOptions {
            data_file: dir.join("certificates.json"),
            filter: StatusFilter::All,
            notice_ms: DEFAULT_NOTICE_MS,
        }
    }

    fn new_certificate(attachment: Option<PathBuf>) -> NewCertificate {
        NewCertificate {
            title: "Security Plus".to_string(),
            provider: "CompTIA".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
            attachment,
        }
    }

    #[tokio::test]
    async fn submit_appends_and_raises_a_notice() {
        let dir = tempdir().unwrap();
        let mut tracker = Tracker::new(options(dir.path())).unwrap();
        let index = tracker.submit(new_certificate(None)).await.unwrap();
        assert_eq!(index, 3);
        assert_eq!(tracker.notice().unwrap().text, "Certificate saved");
        assert_eq!(tracker.store().len(), 4);
    }

    #[tokio::test]
    async fn failed_encode_leaves_the_store_untouched() {
        let dir = tempdir().unwrap();
        let mut tracker = Tracker::new(options(dir.path())).unwrap();
        let before = tracker.store().records().to_vec();
        let result = tracker
            .submit(new_certificate(Some(PathBuf::from("/nonexistent/cert.pdf"))))
            .await;
        assert!(result.is_err());
        assert_eq!(tracker.store().records(), before.as_slice());
        assert!(tracker.notice().is_none());
    }

    #[test]
    fn stale_timers_cannot_clear_a_newer_notice() {
        let dir = tempdir().unwrap();
        let mut tracker = Tracker::new(options(dir.path())).unwrap();
        let first = tracker.show_notice("Certificate saved");
        let second = tracker.show_notice("Certificate saved");
        assert!(!tracker.dismiss_notice(first));
        assert_eq!(tracker.notice().unwrap().seq, second);
        assert!(tracker.dismiss_notice(second));
        assert!(tracker.notice().is_none());
    }

    #[tokio::test]
    async fn open_validates_the_record_index() {
        let dir = tempdir().unwrap();
        let mut tracker = Tracker::new(options(dir.path())).unwrap();
        tracker.apply(TrackerEvent::Open(2)).await.unwrap();
        assert_eq!(tracker.detail_view().unwrap().title, "Azure Fundamentals");

        let err = tracker.apply(TrackerEvent::Open(9)).await.unwrap_err();
        assert!(matches!(
            err,
            TrackerError::UnknownIndex { index: 9, len: 3 }
        ));

        tracker.apply(TrackerEvent::CloseDetail).await.unwrap();
        assert!(tracker.detail_view().is_none());
    }

    #[tokio::test]
    async fn filter_events_change_the_list_view() {
        let dir = tempdir().unwrap();
        let mut tracker = Tracker::new(options(dir.path())).unwrap();
        tracker
            .apply(TrackerEvent::Filter(StatusFilter::Expired))
            .await
            .unwrap();
        assert_eq!(tracker.list_view().filter, "expired");
    }
}
