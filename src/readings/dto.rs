use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::readings::repo::Reading;

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub country: String,
    pub state: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateReadingRequest {
    pub assembly_id: i64,
    pub location_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub register_date: OffsetDateTime,
    pub frequency: f64,
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub id: i64,
    pub assembly_id: i64,
    pub location_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub register_date: OffsetDateTime,
    pub frequency: f64,
}

impl From<Reading> for ReadingResponse {
    fn from(r: Reading) -> Self {
        Self {
            id: r.id,
            assembly_id: r.assembly_id,
            location_id: r.location_id,
            register_date: r.register_date,
            frequency: r.frequency,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_request_parses_rfc3339() {
        let req: CreateReadingRequest = serde_json::from_str(
            r#"{
                "assembly_id": 1,
                "location_id": 2,
                "register_date": "2026-08-03T09:30:00-03:00",
                "frequency": 12.0
            }"#,
        )
        .unwrap();
        assert_eq!(req.assembly_id, 1);
        assert_eq!(req.frequency, 12.0);
        assert_eq!(req.register_date.offset().whole_hours(), -3);
    }

    #[test]
    fn pagination_defaults() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }
}
