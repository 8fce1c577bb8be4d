//! Global constants used throughout the updater.
//!
//! Endpoints, file naming conventions, and timeouts live here so the
//! magic values stay discoverable.

use std::time::Duration;

/// Official links API listing every Bedrock distribution download.
pub const DEFAULT_LINKS_ENDPOINT: &str =
    "https://net-secondary.web.minecraft-services.net/api/v1.0/download/links";

/// `downloadType` of the Windows dedicated server build.
pub const DOWNLOAD_TYPE_WINDOWS: &str = "serverBedrockWindows";

/// `downloadType` of the Linux dedicated server build.
pub const DOWNLOAD_TYPE_LINUX: &str = "serverBedrockLinux";

/// Minecraft End User License Agreement.
pub const EULA_URL: &str = "https://www.minecraft.net/en-us/eula";

/// Microsoft Privacy Policy.
pub const PRIVACY_URL: &str = "https://go.microsoft.com/fwlink/?LinkId=521839";

/// Suffix appended to the install directory name to form the backup directory.
pub const BACKUP_SUFFIX: &str = "_backup";

/// File name prefix of staged archives inside the staging directory.
pub const STAGING_PREFIX: &str = "bds-staging";

/// Default total timeout for a links API request.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Default limit on establishing any HTTP connection.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default limit on a stalled archive download: the longest wait for the
/// next piece of the body. The download as a whole has no deadline.
pub const DEFAULT_DOWNLOAD_IDLE_TIMEOUT_SECS: u64 = 60;

/// Steady tick interval for spinners.
pub const SPINNER_TICK: Duration = Duration::from_millis(100);

/// The `downloadType` matching the platform this binary was built for.
#[must_use]
pub const fn platform_download_type() -> &'static str {
    if cfg!(target_os = "windows") { DOWNLOAD_TYPE_WINDOWS } else { DOWNLOAD_TYPE_LINUX }
}

/// User agent sent with every request.
#[must_use]
pub fn default_user_agent() -> String {
    format!("bds-updater/{}", env!("CARGO_PKG_VERSION"))
}
