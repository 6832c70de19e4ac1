use wasm_bindgen::prelude::*;

use crate::domain::logging::{LogComponent, Logger, get_logger};

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod format;
pub mod infrastructure;
pub mod presentation;
pub mod time_utils;

/// Install logging, then mount the dashboard into `<body>`.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let console_logger = if cfg!(debug_assertions) {
        infrastructure::services::ConsoleLogger::new_development()
    } else {
        infrastructure::services::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(console_logger));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));

    get_logger().info(LogComponent::Presentation("Initialize"), "asset dashboard starting");

    leptos::mount_to_body(app::App);
}
