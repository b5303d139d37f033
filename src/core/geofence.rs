use crate::core::haversine::haversine_meters;
use crate::domain::model::{GeoCoordinate, Workplace};
use crate::utils::error::{GeoError, Result};
use crate::utils::validation::validate_meters;

/// Exit status of a single-point check that lands outside the geofence.
pub const EXIT_OUTSIDE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeofenceCheck {
    pub distance_m: f64,
    pub inside: bool,
}

impl GeofenceCheck {
    pub fn exit_code(&self) -> i32 {
        if self.inside {
            0
        } else {
            EXIT_OUTSIDE
        }
    }
}

/// Decides whether a reported point counts as being at a workplace.
///
/// A point is inside when its distance is at most the workplace radius plus
/// `tolerance_m`. The boundary itself is inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeofencePolicy {
    tolerance_m: f64,
}

impl GeofencePolicy {
    pub fn new(tolerance_m: f64) -> Result<Self> {
        validate_meters("geofence.tolerance_m", tolerance_m, 0.0, false)?;
        Ok(Self { tolerance_m })
    }

    pub fn tolerance_m(&self) -> f64 {
        self.tolerance_m
    }

    pub fn evaluate(&self, workplace: &Workplace, point: &GeoCoordinate) -> GeofenceCheck {
        let distance_m = haversine_meters(&workplace.location, point);
        GeofenceCheck {
            distance_m,
            inside: distance_m <= workplace.radius_m + self.tolerance_m,
        }
    }

    /// Evaluates `point` against the nearest of `workplaces`.
    pub fn evaluate_nearest<'a>(
        &self,
        workplaces: &'a [Workplace],
        point: &GeoCoordinate,
    ) -> Option<(&'a Workplace, GeofenceCheck)> {
        nearest(workplaces, point).map(|(workplace, distance_m)| {
            (
                workplace,
                GeofenceCheck {
                    distance_m,
                    inside: distance_m <= workplace.radius_m + self.tolerance_m,
                },
            )
        })
    }

    /// Checks `point` against the workplace named `workplace_id`, or the nearest one when `None`.
    pub fn check_location<'a>(
        &self,
        workplaces: &'a [Workplace],
        workplace_id: Option<&str>,
        point: &GeoCoordinate,
    ) -> Result<(&'a Workplace, GeofenceCheck)> {
        match workplace_id {
            Some(id) => {
                let workplace = workplaces.iter().find(|w| w.id == id).ok_or_else(|| {
                    GeoError::InvalidConfigValueError {
                        field: "workplace".to_string(),
                        value: id.to_string(),
                        reason: "No workplace with this id in the configuration".to_string(),
                    }
                })?;
                Ok((workplace, self.evaluate(workplace, point)))
            }
            None => self
                .evaluate_nearest(workplaces, point)
                .ok_or_else(|| GeoError::MissingConfigError {
                    field: "workplaces".to_string(),
                }),
        }
    }
}

/// The workplace closest to `point` and its distance in meters. The first one wins ties.
pub fn nearest<'a>(workplaces: &'a [Workplace], point: &GeoCoordinate) -> Option<(&'a Workplace, f64)> {
    workplaces
        .iter()
        .map(|workplace| (workplace, haversine_meters(&workplace.location, point)))
        .fold(None, |best, (workplace, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((workplace, distance)),
        })
}
