use std::fmt::Display;

use chrono::{DateTime, Datelike, NaiveDate};

use crate::error::{SvError, SvResult};

#[derive(Clone, Debug, PartialEq)]
pub struct FiscalQuarter {
    pub year: i32,
    pub quarter: u8, // 1, 2, 3, 4
}

pub fn date_from_str(s: &str) -> SvResult<NaiveDate> {
    const FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y%m%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y%m%dT%H%M%S",        // ISO 8601 Basic
        "%Y-%m-%dT%H:%M:%S%.f", // ISO 8601 Extended
    ];

    let s = s.trim();

    for format in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
        // RFC 3339
        return Ok(datetime.date_naive());
    }

    Err(SvError::Invalid {
        code: "INVALID_DATE",
        message: format!("Unable to parse date '{s}'"),
    })
}

pub fn date_to_fiscal_quarter(date: &NaiveDate) -> FiscalQuarter {
    let year = date.year();
    let quarter: u8 = (((date.month() - 1) / 3) + 1) as u8;

    FiscalQuarter { year, quarter }
}

pub fn date_to_str(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl Display for FiscalQuarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_str() {
        assert_eq!(
            date_to_str(&date_from_str("20231231").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31 16:00:00").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59.123456").unwrap()),
            "2023-12-31"
        );
        assert_eq!(
            date_to_str(&date_from_str("2023-12-31T23:59:59+08:00").unwrap()),
            "2023-12-31"
        );
        assert!(date_from_str("invalid-date").is_err());
        assert!(date_from_str("").is_err());
    }

    #[test]
    fn test_date_to_fiscal_quarter() {
        let q = date_to_fiscal_quarter(&NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(q, FiscalQuarter { year: 2024, quarter: 1 });
        assert_eq!(q.to_string(), "2024Q1");

        let q = date_to_fiscal_quarter(&NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(q.to_string(), "2023Q4");

        let q = date_to_fiscal_quarter(&NaiveDate::from_ymd_opt(2023, 7, 1).unwrap());
        assert_eq!(q.quarter, 3);
    }
}
