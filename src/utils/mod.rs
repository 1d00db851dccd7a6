use chrono::NaiveDate;

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

pub fn parse_index(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| format!("expected a record index: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date(" 2024-06-20 ").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
    }

    #[test]
    fn parse_date_rejects_other_shapes() {
        assert!(parse_date("20/06/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn parse_index_accepts_plain_numbers() {
        assert_eq!(parse_index(" 2 ").unwrap(), 2);
    }

    #[test]
    fn parse_index_rejects_negatives_and_text() {
        assert!(parse_index("-1").is_err());
        assert!(parse_index("two").is_err());
    }
}
