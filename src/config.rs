use std::env;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Medicare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the patient register inside the data directory.
pub const DATABASE_FILE: &str = "healthcare.db";

/// Environment variable that points at an explicit database file.
pub const DATABASE_ENV: &str = "MEDICARE_DB";

/// Get the application data directory.
/// ~/Medicare/ on all platforms; the working directory when there is no home.
pub fn app_data_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(APP_NAME),
        None => PathBuf::from("."),
    }
}

/// Database path: `$MEDICARE_DB` if set and non-empty, else the data directory.
pub fn database_path() -> PathBuf {
    database_path_from(env::var_os(DATABASE_ENV).map(PathBuf::from))
}

fn database_path_from(override_path: Option<PathBuf>) -> PathBuf {
    match override_path {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => app_data_dir().join(DATABASE_FILE),
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medicare=info,medicare_lib=info"
}
