//! Caller identity used to partition rate-limit counters.
//!
//! The key is taken from proxy headers and is **not** verified: a client
//! that talks to the server directly can forge `x-forwarded-for` and get a
//! fresh quota per forged address. Deploy behind a proxy that overwrites
//! these headers if that matters.

/// Key used when no identifying header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derives the client key from the raw `x-forwarded-for` and `x-real-ip`
/// header values.
///
/// Precedence: the first comma-separated entry of `x-forwarded-for`
/// (trimmed), then `x-real-ip` (trimmed), then [`UNKNOWN_CLIENT`]. Blank
/// values are skipped so the key is never empty.
pub fn client_key(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    let forwarded = forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    match real_ip.map(str::trim).filter(|v| !v.is_empty()) {
        Some(ip) => ip.to_string(),
        None => UNKNOWN_CLIENT.to_string(),
    }
}
