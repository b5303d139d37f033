// Domain layer: coordinates, workplaces, check-in records and the ports the pipeline runs through.

pub mod model;
pub mod ports;
