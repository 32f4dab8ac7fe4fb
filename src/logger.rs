use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

/// Environment variable holding `env_logger` filter directives.
pub const LOG_ENV: &str = "RUST_LOG";

static INIT: Once = Once::new();

/// Warnings only by default so log lines stay out of the console menu;
/// `filters` (e.g. `keyslot::table=debug`) are layered on top.
fn console_builder(filters: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .format_timestamp_millis();
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder
}

/// Installs the `env_logger` backend once per process, honouring [`LOG_ENV`].
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let filters = std::env::var(LOG_ENV).ok();
        // Tests and embedding binaries may have installed a logger already.
        let _ = console_builder(filters.as_deref()).try_init();
    });
}
