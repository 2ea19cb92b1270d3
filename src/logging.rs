use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{format_description, Config, ConfigBuilder, SimpleLogger};
use time::format_description::FormatItem;
use time::UtcOffset;

pub fn init(debug: bool) -> Result<()> {
    SimpleLogger::init(level_filter(debug), get_config()).context("Failed to initialize logger")?;

    Ok(())
}

fn level_filter(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn get_config() -> Config {
    ConfigBuilder::new()
        .set_time_offset(get_local_offset()) // Set local time offset.
        .set_time_format_custom(get_time_format()) // Use a custom time format.
        .set_level_padding(simplelog::LevelPadding::Right) // Right-align log levels.
        .set_thread_level(LevelFilter::Off) // Disable thread information.
        .set_target_level(LevelFilter::Debug) // Show module path for Debug level and above.
        .set_write_log_enable_colors(true) // Enable colored log output.
        .build()
}

// The local offset cannot be read soundly once the runtime has spawned
// worker threads; timestamps fall back to UTC then.
fn get_local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn get_time_format() -> &'static [FormatItem<'static>] {
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]")
}
