//! Socket URL derivation.
//!
//! The socket scheme follows the server's HTTP scheme: `http` becomes `ws`
//! and `https` becomes `wss`. A join response may carry an absolute socket
//! URL or a path relative to the server.

use url::Url;

use crate::ApiError;

/// Parse a server base such as `localhost:8877` or `https://poker.example`.
///
/// A bare host is taken as `http`.
pub fn parse_server(base: &str) -> Result<Url, ApiError> {
    let url = Url::parse(base)
        .ok()
        .filter(|u| u.has_host())
        .map_or_else(|| Url::parse(&format!("http://{base}")), Ok)
        .map_err(|e| ApiError::InvalidUrl { url: base.to_string(), reason: e.to_string() })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ApiError::UnsupportedScheme(other.to_string())),
    }
}

/// Convert an HTTP URL to the matching socket URL.
pub fn to_socket_url(mut url: Url) -> Result<Url, ApiError> {
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Ok(url),
        other => return Err(ApiError::UnsupportedScheme(other.to_string())),
    };

    url.set_scheme(scheme).map_err(|()| ApiError::UnsupportedScheme(scheme.to_string()))?;
    Ok(url)
}

/// Resolve the `wsUrl` of a join response against `server`.
///
/// Absolute socket URLs are used as given. Anything else is joined onto the
/// server base and given the socket scheme matching the server's.
pub fn resolve_socket_url(server: &Url, ws_url: &str) -> Result<Url, ApiError> {
    if ws_url.starts_with("ws://") || ws_url.starts_with("wss://") {
        return Url::parse(ws_url)
            .map_err(|e| ApiError::InvalidUrl { url: ws_url.to_string(), reason: e.to_string() });
    }

    let joined = server
        .join(ws_url)
        .map_err(|e| ApiError::InvalidUrl { url: ws_url.to_string(), reason: e.to_string() })?;
    to_socket_url(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_defaults_to_http() {
        let url = parse_server("localhost:8877").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8877/");
    }

    #[test]
    fn socket_scheme_follows_server_scheme() {
        let plain = parse_server("http://poker.example").unwrap();
        let secure = parse_server("https://poker.example").unwrap();

        assert_eq!(
            resolve_socket_url(&plain, "/ws/games/g-1").unwrap().as_str(),
            "ws://poker.example/ws/games/g-1"
        );
        assert_eq!(
            resolve_socket_url(&secure, "/ws/games/g-1").unwrap().as_str(),
            "wss://poker.example/ws/games/g-1"
        );
    }

    #[test]
    fn absolute_socket_url_is_kept() {
        let server = parse_server("https://poker.example").unwrap();
        let url = resolve_socket_url(&server, "ws://10.0.0.5:9000/ws/games/g-1").unwrap();
        assert_eq!(url.as_str(), "ws://10.0.0.5:9000/ws/games/g-1");
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(matches!(parse_server("ftp://poker.example"), Err(ApiError::UnsupportedScheme(_))));
    }
}
