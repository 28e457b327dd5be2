use std::str::FromStr;
use time::{format_description::well_known::Rfc3339, UtcOffset};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::time::OffsetTime;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::DEBUG;

pub fn init() {
    let level = level_filter(option_env!("VIRTUOSO_LOG"));
    // timestamps are pinned to UTC; the service runs in containers where the
    // host offset carries no meaning
    let time = OffsetTime::new(UtcOffset::UTC, Rfc3339);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(time)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_target(false)
        .try_init()
        .expect("failed to initialize subscriber");
}

fn level_filter(env_var: Option<&str>) -> LevelFilter {
    let Some(var) = env_var else {
        return DEFAULT_LOG_LEVEL;
    };
    // tracing-core parses the empty string as ERROR; treat it as absent
    let var = var.trim();
    if var.is_empty() {
        return DEFAULT_LOG_LEVEL;
    }

    if let Ok(level) = LevelFilter::from_str(var) {
        level
    } else {
        DEFAULT_LOG_LEVEL
    }
}
