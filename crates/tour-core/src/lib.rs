pub mod catalog;
pub mod config;
pub mod i18n;
pub mod lang;
pub mod platform;
pub mod prefs;
pub mod session;
