//! Device fingerprinting
//!
//! Derives a best-effort device tag from the request's IP and headers.
//! This is a fraud-signal annotation only, never a trust boundary: two
//! browsers can collide and a client can trivially change its own tag.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the hex-encoded fingerprint tag
const FINGERPRINT_LEN: usize = 32;

/// Device metadata attached to an order at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub ip: String,
    pub user_agent: String,
    /// mobile | tablet | desktop | unknown
    pub device_type: String,
    pub browser: String,
    pub os: String,
    /// Opaque content hash of ip + headers
    pub fingerprint: String,
}

impl DeviceInfo {
    /// Collect device info from the connection IP and request headers
    pub fn collect(ip: &str, headers: &HeaderMap) -> Self {
        let user_agent = header_str(headers, "user-agent");
        let accept_language = header_str(headers, "accept-language");
        let accept_encoding = header_str(headers, "accept-encoding");

        let mut hasher = Sha256::new();
        hasher.update(ip.as_bytes());
        hasher.update(b"-");
        hasher.update(user_agent.as_bytes());
        hasher.update(b"-");
        hasher.update(accept_language.as_bytes());
        hasher.update(b"-");
        hasher.update(accept_encoding.as_bytes());
        let mut fingerprint = hex::encode(hasher.finalize());
        fingerprint.truncate(FINGERPRINT_LEN);

        Self {
            ip: ip.to_string(),
            device_type: classify_device(&user_agent).to_string(),
            browser: classify_browser(&user_agent).to_string(),
            os: classify_os(&user_agent).to_string(),
            user_agent,
            fingerprint,
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn classify_device(ua: &str) -> &'static str {
    let ua = ua.to_ascii_lowercase();
    if ua.contains("ipad") || ua.contains("tablet") {
        "tablet"
    } else if ua.contains("mobi") || ua.contains("android") || ua.contains("iphone") {
        "mobile"
    } else if ua.is_empty() {
        "unknown"
    } else {
        "desktop"
    }
}

fn classify_browser(ua: &str) -> &'static str {
    let ua = ua.to_ascii_lowercase();
    // Order matters: Edge and Opera embed "chrome", Chrome embeds "safari"
    if ua.contains("edg/") || ua.contains("edge") {
        "Edge"
    } else if ua.contains("opr/") || ua.contains("opera") {
        "Opera"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("chrome") || ua.contains("crios") {
        "Chrome"
    } else if ua.contains("safari") {
        "Safari"
    } else {
        "unknown"
    }
}

fn classify_os(ua: &str) -> &'static str {
    let ua = ua.to_ascii_lowercase();
    if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ios") {
        "iOS"
    } else if ua.contains("windows") {
        "Windows"
    } else if ua.contains("mac os") || ua.contains("macintosh") {
        "macOS"
    } else if ua.contains("linux") {
        "Linux"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

    fn headers_with_ua(ua: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_str(ua).unwrap());
        headers.insert("accept-language", HeaderValue::from_static("en-US"));
        headers
    }

    #[test]
    fn fingerprint_is_stable_and_bounded() {
        let headers = headers_with_ua(IPHONE_UA);
        let a = DeviceInfo::collect("203.0.113.9", &headers);
        let b = DeviceInfo::collect("203.0.113.9", &headers);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.fingerprint.len(), FINGERPRINT_LEN);
    }

    #[test]
    fn fingerprint_varies_with_ip() {
        let headers = headers_with_ua(IPHONE_UA);
        let a = DeviceInfo::collect("203.0.113.9", &headers);
        let b = DeviceInfo::collect("203.0.113.10", &headers);
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn classifies_iphone() {
        let info = DeviceInfo::collect("127.0.0.1", &headers_with_ua(IPHONE_UA));
        assert_eq!(info.device_type, "mobile");
        assert_eq!(info.browser, "Safari");
        assert_eq!(info.os, "iOS");
    }

    #[test]
    fn classifies_desktop_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
            (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
        let info = DeviceInfo::collect("127.0.0.1", &headers_with_ua(ua));
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser, "Chrome");
        assert_eq!(info.os, "Windows");
    }

    #[test]
    fn missing_headers_degrade_to_unknown() {
        let info = DeviceInfo::collect("127.0.0.1", &HeaderMap::new());
        assert_eq!(info.device_type, "unknown");
        assert_eq!(info.browser, "unknown");
        assert_eq!(info.os, "unknown");
        assert_eq!(info.fingerprint.len(), FINGERPRINT_LEN);
    }
}
