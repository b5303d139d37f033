use crate::utils::error::{GeoError, Result};
use crate::utils::validation::{validate_latitude, validate_longitude, validate_meters};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point on the Earth's surface in signed decimal degrees.
///
/// Latitude lies in [-90, 90] and longitude in [-180, 180]; both are finite.
/// The only ways to build one are [`GeoCoordinate::new`] and deserialization,
/// and both enforce those bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for GeoCoordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        GeoCoordinate::new(raw.latitude, raw.longitude)
    }
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        validate_latitude("latitude", latitude)?;
        validate_longitude("longitude", longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The diametrically opposite point.
    pub fn antipode(&self) -> Self {
        let longitude = if self.longitude <= 0.0 {
            self.longitude + 180.0
        } else {
            self.longitude - 180.0
        };
        Self {
            latitude: -self.latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        crate::core::haversine::haversine_meters(self, other)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workplace {
    pub id: String,
    pub name: String,
    pub location: GeoCoordinate,
    pub radius_m: f64,
}

impl Workplace {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: GeoCoordinate,
        radius_m: f64,
    ) -> Result<Self> {
        validate_meters("radius_m", radius_m, 0.0, true)?;
        Ok(Self {
            id: id.into(),
            name: name.into(),
            location,
            radius_m,
        })
    }
}

/// One clock-in event as exported by the time-tracking portal.
///
/// Coordinates stay raw here; rows with out-of-range values are reported, not dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub employee_id: String,
    pub workplace_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CheckIn {
    pub fn coordinate(&self) -> Result<GeoCoordinate> {
        GeoCoordinate::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInOutcome {
    Within,
    Outside,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedCheckIn {
    pub employee_id: String,
    pub recorded_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub workplace_id: Option<String>,
    pub distance_m: Option<f64>,
    pub outcome: CheckInOutcome,
    pub reason: Option<String>,
}

impl EvaluatedCheckIn {
    pub fn rejected(check_in: CheckIn, reason: String) -> Self {
        Self {
            employee_id: check_in.employee_id,
            recorded_at: check_in.recorded_at,
            latitude: check_in.latitude,
            longitude: check_in.longitude,
            workplace_id: check_in.workplace_id,
            distance_m: None,
            outcome: CheckInOutcome::Rejected,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub within: usize,
    pub outside: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub entries: Vec<EvaluatedCheckIn>,
}

impl CheckInReport {
    pub fn new(entries: Vec<EvaluatedCheckIn>) -> Self {
        let mut summary = ReportSummary {
            total: entries.len(),
            ..ReportSummary::default()
        };
        for entry in &entries {
            match entry.outcome {
                CheckInOutcome::Within => summary.within += 1,
                CheckInOutcome::Outside => summary.outside += 1,
                CheckInOutcome::Rejected => summary.rejected += 1,
            }
        }
        Self {
            generated_at: Utc::now(),
            summary,
            entries,
        }
    }
}
