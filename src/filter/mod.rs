use chrono::{DateTime, Utc};

use crate::status::{self, Status};
use crate::store::CertificateRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Expired,
    Soon,
    Active,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "expired" => Some(Self::Expired),
            "soon" => Some(Self::Soon),
            "active" => Some(Self::Active),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Expired => "expired",
            Self::Soon => "soon",
            Self::Active => "active",
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Expired => status == Status::Expired,
            Self::Soon => status == Status::Soon,
            Self::Active => status == Status::Active,
        }
    }
}

pub fn apply<'a>(
    filter: StatusFilter,
    records: &'a [CertificateRecord],
    now: DateTime<Utc>,
) -> Vec<(usize, &'a CertificateRecord)> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.matches(status::classify(status::days_left(r.expiry_date, now))))
        .collect()
}
