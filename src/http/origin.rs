//! Derives the externally visible origin of a request.

use std::net::IpAddr;

use axum::http::{HeaderMap, Uri};
use axum_extra::headers::{HeaderMapExt, Host};

/// Scheme and authority the client used to reach us, e.g. `https://gateway.example.com`.
pub fn request_origin(headers: &HeaderMap, uri: &Uri) -> String {
    let authority = forwarded_value(headers, "x-forwarded-host")
        .or_else(|| headers.typed_get::<Host>().map(|host| host_authority(&host)))
        .or_else(|| uri.authority().map(|authority| authority.to_string()))
        .unwrap_or_else(|| "localhost".to_string());

    let scheme = forwarded_value(headers, "x-forwarded-proto")
        .map(|proto| proto.to_ascii_lowercase())
        .filter(|proto| proto == "http" || proto == "https")
        .or_else(|| uri.scheme_str().map(str::to_string))
        .unwrap_or_else(|| default_scheme(&authority).to_string());

    format!("{scheme}://{authority}")
}

fn host_authority(host: &Host) -> String {
    match host.port() {
        Some(port) => format!("{}:{port}", host.hostname()),
        None => host.hostname().to_string(),
    }
}

/// First entry of a possibly comma-separated proxy header.
fn forwarded_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn default_scheme(authority: &str) -> &'static str {
    if is_local_host(hostname(authority)) {
        "http"
    } else {
        "https"
    }
}

fn hostname(authority: &str) -> &str {
    if let Some(rest) = authority.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    authority.split(':').next().unwrap_or(authority)
}

fn is_local_host(hostname: &str) -> bool {
    let hostname = hostname.to_ascii_lowercase();
    hostname == "localhost"
        || hostname.ends_with(".localhost")
        || hostname
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback() || ip.is_unspecified())
            .unwrap_or(false)
}
