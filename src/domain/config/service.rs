/// Process-wide settings resolved once at startup from the environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Explicit public origin for share links. When unset, the origin is
    /// inferred per request from forwarding headers.
    pub public_origin: Option<String>,
    pub jwt_secret: String,
    /// Gates the manual cleanup endpoint via the X-Admin-Secret header.
    pub admin_secret: String,
    pub sweep_interval_secs: u64,
}
