pub mod engine;
pub mod geofence;
pub mod haversine;
pub mod pipeline;

pub use crate::domain::model::{CheckIn, CheckInReport};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
