//! Constants shared across the jirest crates.

/// User-Agent header value sent with every request
pub const USER_AGENT: &str = concat!("jirest/", env!("CARGO_PKG_VERSION"));

/// REST API version used when none is configured
pub const DEFAULT_API_VERSION: u8 = 2;

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE_NAME: &str = "jira.toml";

/// Fallback `.netrc` machine for Atlassian Cloud credentials
pub const ATLASSIAN_CLOUD_MACHINE: &str = "atlassian.net";

/// Environment variable storing the Jira host
pub const ENV_JIRA_HOST: &str = "JIRA_HOST";

/// Environment variable storing the Jira username
pub const ENV_JIRA_USER: &str = "JIRA_USER";

/// Environment variable storing the Jira password or API token
pub const ENV_JIRA_PASS: &str = "JIRA_PASS";

/// Environment variable storing a personal access token (Bearer auth)
pub const ENV_JIRA_PAT: &str = "JIRA_PAT";

/// Environment variable switching the client to REST API v3
pub const ENV_JIRA_REST_API_V3: &str = "JIRA_REST_API_V3";

/// Environment variable overriding the request timeout in seconds
pub const ENV_JIRA_TIMEOUT: &str = "JIRA_TIMEOUT";
