pub fn set(env_filter: String) {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(env_filter)))
        .with_writer(std::io::stderr)
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();
}

/// Each `-v` raises the configured level by one step.
pub fn level(configured: &str, verbose: u8) -> String {
    const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
    let base = LEVELS
        .iter()
        .position(|level| level.eq_ignore_ascii_case(configured))
        .unwrap_or(3);
    let index = (base + verbose as usize).min(LEVELS.len() - 1);
    LEVELS[index].to_string()
}
