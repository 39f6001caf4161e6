use axum::http::{header, HeaderMap};

/// Last-resort origin for local development, matching the frontend dev server.
const FALLBACK_ORIGIN: &str = "http://localhost:5173";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Resolves the public origin share links are built against. Pure function of
/// configuration and request headers so upload and metadata lookups always
/// produce the same URL for the same request context.
///
/// Precedence: configured origin, forwarded-proto/host pair from a reverse
/// proxy, the Origin header, the Host header (the listener itself is plain
/// HTTP; TLS terminates at the proxy), then a hardcoded fallback.
pub fn resolve_origin(configured: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(origin) = configured {
        return origin.trim_end_matches('/').to_string();
    }

    let forwarded_proto = header_str(headers, "x-forwarded-proto");
    let forwarded_host = header_str(headers, "x-forwarded-host")
        .or_else(|| header_str(headers, "x-forwarded-server"));
    if let (Some(proto), Some(host)) = (forwarded_proto, forwarded_host) {
        return format!("{}://{}", proto, host);
    }

    if let Some(origin) = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        return origin.trim_end_matches('/').to_string();
    }

    if let Some(host) = headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        return format!("http://{}", host);
    }

    FALLBACK_ORIGIN.to_string()
}

/// The link recipients open: a frontend route carrying the short code.
pub fn share_url(origin: &str, short_code: &str) -> String {
    format!("{}/download/{}", origin, short_code)
}
