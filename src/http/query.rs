//! Query-string shapes and their conversion to store queries.

use chrono::{Months, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use super::error::ApiError;
use crate::entity::Timestamp;
use crate::models::BookSearch;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `GET /api/books` filters. `genres` is comma separated; dates are RFC 3339.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genres: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_stock: Option<u32>,
    pub max_stock: Option<u32>,
    pub published_after: Option<Timestamp>,
    pub published_before: Option<Timestamp>,
}

impl From<BookQuery> for BookSearch {
    fn from(query: BookQuery) -> Self {
        BookSearch {
            title: query.title.unwrap_or_default(),
            author: query.author.unwrap_or_default(),
            genres: query
                .genres
                .map(|genres| {
                    genres
                        .split(',')
                        .map(str::trim)
                        .filter(|genre| !genre.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            min_price: query.min_price.unwrap_or_default(),
            max_price: query.max_price.unwrap_or_default(),
            min_stock: query.min_stock.unwrap_or_default(),
            max_stock: query.max_stock.unwrap_or_default(),
            published_after: query.published_after,
            published_before: query.published_before,
        }
    }
}

/// `GET /api/reports/sales` date range, both days inclusive.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportQuery {
    /// Resolve to `[start 00:00:00, end 23:59:59.999999999]` UTC.
    ///
    /// Missing `end_date` is today; missing `start_date` is one month before the end day.
    pub fn range(&self, today: NaiveDate) -> Result<(Timestamp, Timestamp), ApiError> {
        let end_day = match &self.end_date {
            Some(raw) => parse_date("end_date", raw)?,
            None => today,
        };
        let start_day = match &self.start_date {
            Some(raw) => parse_date("start_date", raw)?,
            None => end_day
                .checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDate::MIN),
        };
        if start_day > end_day {
            return Err(ApiError::BadRequest(
                "start_date must not be after end_date".to_string(),
            ));
        }

        let start = start_day.and_time(NaiveTime::MIN).and_utc();
        let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap_or(NaiveTime::MIN);
        let end = end_day.and_time(end_of_day).and_utc();
        Ok((start, end))
    }

    pub fn range_ending_today(&self) -> Result<(Timestamp, Timestamp), ApiError> {
        self.range(Utc::now().date_naive())
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|err| {
        ApiError::BadRequest(format!("invalid {field} `{raw}`, expected YYYY-MM-DD: {err}"))
    })
}
