/// Configuration default values
///
/// All defaults live here so they can be changed in one place.
// Config file discovery
pub const DEFAULT_CONFIG_FILE: &str = "media-probe.toml";
pub const CONFIG_FILE_ENV: &str = "MEDIA_PROBE_CONFIG";
pub const ENV_PREFIX: &str = "MEDIA_PROBE_";

// HTTP transport defaults
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RESTORE_DISGUISED_HEADERS: bool = true;

// Fetch defaults
pub const DEFAULT_ENCODING: &str = "UTF-8";

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
