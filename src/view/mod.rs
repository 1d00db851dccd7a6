pub mod page;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::filter::{self, StatusFilter};
use crate::status::{self, Status};
use crate::store::CertificateRecord;

pub const EMPTY_FILTER_MESSAGE: &str = "No certificates found for this filter.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct CardView {
    pub index: usize,
    pub title: String,
    pub provider: String,
    pub issued: String,
    pub expires: String,
    pub status: Status,
    pub status_label: &'static str,
    pub days_left: i64,
    pub remaining: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListView {
    pub filter: &'static str,
    pub total: usize,
    pub soon_count: usize,
    pub cards: Vec<CardView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DetailView {
    pub index: usize,
    pub title: String,
    pub meta: String,
    pub file_url: String,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn remaining_label(days_left: i64) -> String {
    if days_left < 0 {
        format!("Expired {} days ago", days_left.abs())
    } else {
        format!("{days_left} days left")
    }
}

pub fn build_card(index: usize, record: &CertificateRecord, now: DateTime<Utc>) -> CardView {
    let days_left = status::days_left(record.expiry_date, now);
    let status = status::classify(days_left);
    CardView {
        index,
        title: record.title.clone(),
        provider: record.provider.clone(),
        issued: format_date(record.issue_date),
        expires: format_date(record.expiry_date),
        status,
        status_label: status.label(),
        days_left,
        remaining: remaining_label(days_left),
    }
}

pub fn build_list_view(
    records: &[CertificateRecord],
    filter: StatusFilter,
    now: DateTime<Utc>,
) -> ListView {
    let soon_count = records
        .iter()
        .filter(|r| status::classify(status::days_left(r.expiry_date, now)) == Status::Soon)
        .count();
    let cards = filter::apply(filter, records, now)
        .into_iter()
        .map(|(index, record)| build_card(index, record, now))
        .collect();
    ListView {
        filter: filter.as_str(),
        total: records.len(),
        soon_count,
        cards,
    }
}

pub fn build_detail_view(records: &[CertificateRecord], index: usize) -> Option<DetailView> {
    let record = records.get(index)?;
    Some(DetailView {
        index,
        title: record.title.clone(),
        meta: format!(
            "Provider: {} | Issue: {} | Expiry: {}",
            record.provider,
            format_date(record.issue_date),
            format_date(record.expiry_date)
        ),
        file_url: record.file_url.clone(),
    })
}

pub fn render_text(view: &ListView) -> Vec<u8> {
    let mut out = String::new();
    for card in view.cards.iter() {
        out.push_str(&format!(
            "#{} [{}] {} ({})\n",
            card.index, card.status_label, card.title, card.provider
        ));
        out.push_str(&format!(
            "    Issue: {} | Expiry: {}\n",
            card.issued, card.expires
        ));
        out.push_str(&format!("    {}\n", card.remaining));
    }
    if view.cards.is_empty() {
        out.push_str(EMPTY_FILTER_MESSAGE);
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(view: &ListView) -> Vec<u8> {
    serde_json::to_vec_pretty(view).unwrap_or_else(|_| b"{}\n".to_vec())
}

pub fn render_html(records: &[CertificateRecord], filter: StatusFilter) -> Vec<u8> {
    page::render_html(records, filter)
}
