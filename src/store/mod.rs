use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_ATTACHMENT: &str = "#";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub title: String,
    pub provider: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub file_url: String,
}

impl CertificateRecord {
    pub fn has_attachment(&self) -> bool {
        self.file_url != NO_ATTACHMENT
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write store '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize records: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct CertStore {
    records: Vec<CertificateRecord>,
    path: PathBuf,
}

impl CertStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let records = match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(_) => seed_records(),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => seed_records(),
            Err(e) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Ok(Self {
            records,
            path: path.to_path_buf(),
        })
    }

    pub fn records(&self) -> &[CertificateRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&CertificateRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, record: CertificateRecord) -> Result<usize, StoreError> {
        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(self.records.len() - 1)
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| StoreError::Serialize { source: e })?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                    path: parent.display().to_string(),
                    source: e,
                })?;
            }
        }
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, &bytes).map_err(|e| StoreError::Write {
            path: tmp.display().to_string(),
            source: e,
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

pub fn seed_records() -> Vec<CertificateRecord> {
    vec![
        CertificateRecord {
            title: "AWS Cloud Practitioner".to_string(),
            provider: "Amazon Web Services".to_string(),
            issue_date: ymd(2024, 1, 15),
            expiry_date: ymd(2026, 1, 15),
            file_url: NO_ATTACHMENT.to_string(),
        },
        CertificateRecord {
            title: "Google Cloud Associate".to_string(),
            provider: "Google Cloud".to_string(),
            issue_date: ymd(2024, 6, 20),
            expiry_date: ymd(2025, 6, 20),
            file_url: NO_ATTACHMENT.to_string(),
        },
        CertificateRecord {
            title: "Azure Fundamentals".to_string(),
            provider: "Microsoft".to_string(),
            issue_date: ymd(2023, 3, 10),
            expiry_date: ymd(2024, 12, 10),
            file_url: NO_ATTACHMENT.to_string(),
        },
    ]
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_record() -> CertificateRecord {
        CertificateRecord {
            title: "Kubernetes Administrator".to_string(),
            provider: "CNCF".to_string(),
            issue_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 2, 1).unwrap(),
            file_url: NO_ATTACHMENT.to_string(),
        }
    }

    #[test]
    fn open_seeds_when_slot_is_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("certificates.json");
        let store = CertStore::open(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[0].title, "AWS Cloud Practitioner");
        assert!(!path.exists());
    }

    #[test]
    fn open_seeds_when_slot_is_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("certificates.json");
        fs::write(&path, "{not json").unwrap();
        let store = CertStore::open(&path).unwrap();
        assert_eq!(store.records(), seed_records().as_slice());
    }

    #[test]
    fn append_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("certificates.json");
        let mut store = CertStore::open(&path).unwrap();
        let index = store.append(sample_record()).unwrap();
        assert_eq!(index, 3);

        let reopened = CertStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 4);
        assert_eq!(reopened.records()[3], sample_record());
    }

    #[test]
    fn reopening_saved_state_is_stable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("certificates.json");
        let store = CertStore::open(&path).unwrap();
        store.save().unwrap();
        let first = CertStore::open(&path).unwrap();
        let second = CertStore::open(&path).unwrap();
        assert_eq!(first.records(), store.records());
        assert_eq!(second.records(), store.records());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("certificates.json");
        let store = CertStore::open(&path).unwrap();
        store.save().unwrap();
        assert!(path.exists());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("certificates.json")]);
    }

    #[test]
    fn failed_save_keeps_memory_intact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("certificates.json");
        fs::create_dir(dir.path().join("certificates.json.tmp")).unwrap();
        let mut store = CertStore::open(&path).unwrap();
        let before = store.records().to_vec();
        assert!(store.append(sample_record()).is_err());
        assert_eq!(store.records(), before.as_slice());
        assert!(!path.exists());
    }

    #[test]
    fn wire_format_uses_camel_case_keys_and_iso_dates() {
        let json = serde_json::to_string(&seed_records()).unwrap();
        assert!(json.contains(r#""issueDate":"2024-01-15""#));
        assert!(json.contains(r#""expiryDate":"2026-01-15""#));
        assert!(json.contains(r##""fileUrl":"#""##));
        assert!(!json.contains("issue_date"));
    }
}
