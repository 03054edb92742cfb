// Settings service: persistence of the active region and notification
// preferences

mod mapper;
mod service;

pub use service::SettingsService;
