//! Default settings values

/// Connection URL used when none is configured
pub const URL: &str = "mysql://root@127.0.0.1:3306";

/// Seconds allowed for establishing a connection
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Rows returned by `fetch_many` without an explicit size
pub const ARRAYSIZE: usize = crate::cursor::DEFAULT_ARRAYSIZE;

/// Settings file looked up when no path is given
pub const SETTINGS_FILE: &str = "vtdb";

/// Prefix for environment overrides, e.g. `VTDB_URL`
pub const ENV_PREFIX: &str = "VTDB";
