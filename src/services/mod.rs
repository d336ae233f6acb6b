pub mod config_selector;
pub mod result_formatter;
pub mod schema_resolver;
pub mod sizing_service;
pub mod usage_estimator;
