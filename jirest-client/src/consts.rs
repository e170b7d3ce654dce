//! Constants shared across the client

/// Header the attachments API requires to bypass XSRF checks
pub const ATLASSIAN_TOKEN_HEADER: &str = "X-Atlassian-Token";
pub const ATLASSIAN_TOKEN_NO_CHECK: &str = "no-check";

/// Multipart field name the attachments API reads files from
pub const MULTIPART_FILE_FIELD: &str = "file";

/// Value of the `severity` log field for failures that need operator attention
pub const SEVERITY_CRITICAL: &str = "critical";

/// Headers whose values never reach the logs
pub const SENSITIVE_HEADERS: &[&str] = &["authorization", "proxy-authorization", "cookie", "set-cookie"];

pub(crate) const REDACTED: &str = "<redacted>";
