pub mod estimate_controller;
pub mod settings_controller;
