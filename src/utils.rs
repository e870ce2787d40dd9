use std::path::PathBuf;

/// Read a directory from an environment variable or fall back to a default
pub fn get_dir_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

/// Directory holding the universe JSON files
pub fn get_universe_dir() -> PathBuf {
    get_dir_from_env("UNIVERSE_DIR", ".")
}

/// Root directory for generated reports
pub fn get_report_root() -> PathBuf {
    get_dir_from_env("REPORT_DIR", "reports")
}

/// Exchange-suffixed code to display code ("2330.TW" -> "2330")
pub fn display_code(ticker: &str) -> &str {
    ticker.split('.').next().unwrap_or(ticker)
}

/// Round to a fixed number of decimal places for report output
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
