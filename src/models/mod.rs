// Module exports for models

pub mod preferences;
pub mod schedule;
