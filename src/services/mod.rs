// Service module exports

pub mod database;
pub mod notification;
pub mod schedule;
pub mod settings;
pub mod tracker;
