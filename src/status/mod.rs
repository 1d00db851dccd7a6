use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const SOON_WINDOW_DAYS: i64 = 60;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Expired,
    Soon,
    Active,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Expired => "Expired",
            Status::Soon => "Expiring Soon",
            Status::Active => "Active",
        }
    }

}

pub fn days_left(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry_midnight = expiry.and_time(NaiveTime::MIN).and_utc();
    let ms = (expiry_midnight - now).num_milliseconds();
    let round_up = if ms.rem_euclid(MILLIS_PER_DAY) > 0 { 1 } else { 0 };
    ms.div_euclid(MILLIS_PER_DAY) + round_up
}

pub fn classify(days_left: i64) -> Status {
    if days_left < 0 {
        Status::Expired
    } else if days_left <= SOON_WINDOW_DAYS {
        Status::Soon
    } else {
        Status::Active
    }
}
