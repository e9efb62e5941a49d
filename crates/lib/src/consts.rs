/// Application name, used for data directory names.
pub const APP_NAME: &str = "reentry";

/// File name of the entry point cache inside the data directory.
pub const DATA_FILENAME: &str = "entry_points.json";

/// Environment variable overriding the entry point cache location.
pub const DATA_FILE_ENV: &str = "REENTRY_DATA_FILE";

/// Environment variable listing site directories to scan.
pub const SITE_DIRS_ENV: &str = "REENTRY_SITE_DIRS";
