use diesel::{PgConnection, r2d2::ConnectionManager};
use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_f64, lenient_text, text_patch};

use super::schema::*;

// type alias to use in multiple places
pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type IdType = i32;

/// A row of an uploaded monitoring spreadsheet.
#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct MonitoringRecord {
    pub id: IdType,
    pub state_name: Option<String>,
    pub district_name: Option<String>,
    pub factory_name: Option<String>,
    pub bod: Option<String>,
    pub cod: Option<String>,
    pub ph: Option<String>,
    pub nitrate: Option<String>,
    #[serde(rename = "do")]
    pub dissolved_oxygen: Option<String>,
    pub tds: Option<String>,
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Insertable)]
#[table_name = "excel_data"]
pub struct NewMonitoringRecord {
    pub state_name: Option<String>,
    pub district_name: Option<String>,
    pub factory_name: Option<String>,
    pub bod: Option<String>,
    pub cod: Option<String>,
    pub ph: Option<String>,
    pub nitrate: Option<String>,
    pub dissolved_oxygen: Option<String>,
    pub tds: Option<String>,
    pub zone: Option<String>,
}

/// Partial update of a monitoring record, only the fields present in the
/// request are written.
#[derive(Debug, Default, Deserialize, AsChangeset)]
#[table_name = "excel_data"]
pub struct MonitoringRecordChanges {
    #[serde(default, deserialize_with = "text_patch")]
    pub state_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub district_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub factory_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub bod: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub cod: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub ph: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub nitrate: Option<Option<String>>,
    #[serde(default, rename = "do", deserialize_with = "text_patch")]
    pub dissolved_oxygen: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub tds: Option<Option<String>>,
    #[serde(default, deserialize_with = "text_patch")]
    pub zone: Option<Option<String>>,
}

impl MonitoringRecordChanges {
    pub fn is_empty(&self) -> bool {
        self.state_name.is_none()
            && self.district_name.is_none()
            && self.factory_name.is_none()
            && self.bod.is_none()
            && self.cod.is_none()
            && self.ph.is_none()
            && self.nitrate.is_none()
            && self.dissolved_oxygen.is_none()
            && self.tds.is_none()
            && self.zone.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Serialize)]
pub struct ChartBucket {
    pub id: IdType,
    pub label: String,
    pub bad: f64,
    pub moderate: f64,
    pub good: f64,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[table_name = "chart_data"]
pub struct NewChartBucket {
    pub label: String,
    pub bad: f64,
    pub moderate: f64,
    pub good: f64,
}

/// Body of a chart bucket creation, missing values fall back to `""` and `0`.
#[derive(Debug, Default, Deserialize)]
pub struct ChartBucketInput {
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bad: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub moderate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub good: Option<f64>,
}

impl From<ChartBucketInput> for NewChartBucket {
    fn from(input: ChartBucketInput) -> Self {
        NewChartBucket {
            label: input.label.unwrap_or_default(),
            bad: input.bad.unwrap_or(0.0),
            moderate: input.moderate.unwrap_or(0.0),
            good: input.good.unwrap_or(0.0),
        }
    }
}

// The chart columns are NOT NULL, a null in the body is treated as absent.
#[derive(Debug, Default, Deserialize, AsChangeset)]
#[table_name = "chart_data"]
pub struct ChartBucketChanges {
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub bad: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub moderate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub good: Option<f64>,
}

impl ChartBucketChanges {
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.bad.is_none() && self.moderate.is_none() && self.good.is_none()
    }
}

#[derive(Debug, Queryable)]
pub struct User {
    pub id: IdType,
    pub email: String,
    pub clearance: i32,
}

#[derive(Debug, Queryable)]
pub struct FactoryRegistration {
    pub id: IdType,
    pub factory_name: String,
    pub license_number: String,
    pub waste_type: String,
    pub discharge_method: String,
    pub location_coordinates: String,
    pub registered_by: String,
    pub license_document: Option<String>,
}
