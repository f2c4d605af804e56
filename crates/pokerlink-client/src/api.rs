//! Game server REST helpers.
//!
//! Two calls precede every session: join the game to learn its socket URL,
//! and fetch a short-lived token the socket URL carries as `?token=`.

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ApiError, ws_url};

const WS_TOKEN_PATH: &str = "/api/v1/auth/ws-token";

/// `POST /api/v1/games/{id}/join` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    /// Socket URL, absolute or relative to the server.
    pub ws_url: String,
    /// Joined game.
    pub game_id: String,
}

#[derive(Deserialize)]
struct WsTokenResponse {
    token: String,
}

#[derive(Serialize)]
struct JoinRequest<'a> {
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the game server.
///
/// Authenticates with a bearer token when one is configured.
#[derive(Debug, Clone)]
pub struct GameServerApi {
    http: Client,
    base: Url,
    auth_token: Option<String>,
}

impl GameServerApi {
    /// Create a client for the server at `base`.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidUrl` / `ApiError::UnsupportedScheme` for a bad base
    /// - `ApiError::Request` if the HTTP client cannot be built
    pub fn new(base: &str, auth_token: Option<String>) -> Result<Self, ApiError> {
        let base = ws_url::parse_server(base)?;
        let http = Client::builder()
            .user_agent(concat!("pokerlink/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base, auth_token })
    }

    /// Server base URL.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Fetch a short-lived socket token.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` for a non-success response, e.g. 429 when rate
    ///   limited
    /// - `ApiError::Request` for transport or decode failures
    pub async fn ws_token(&self) -> Result<String, ApiError> {
        let url = self.endpoint(WS_TOKEN_PATH)?;
        let response = self.authorize(self.http.get(url)).send().await?;
        let body: WsTokenResponse = check(response).await?.json().await?;
        Ok(body.token)
    }

    /// Join a game, optionally with its password.
    ///
    /// # Errors
    ///
    /// - `ApiError::Status` for a non-success response
    /// - `ApiError::Request` for transport or decode failures
    pub async fn join_game(
        &self,
        game_id: &str,
        password: Option<&str>,
    ) -> Result<JoinResponse, ApiError> {
        let url = self.endpoint(&format!("/api/v1/games/{game_id}/join"))?;
        let mut request = self.authorize(self.http.post(url));
        if let Some(password) = password {
            request = request.json(&JoinRequest { password });
        }

        let response = request.send().await?;
        tracing::debug!(game_id, status = %response.status(), "join");
        Ok(check(response).await?.json().await?)
    }

    /// Socket URL for a join response's `wsUrl`.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidUrl` if `ws_url` cannot be resolved
    pub fn socket_url(&self, ws_url: &str) -> Result<Url, ApiError> {
        ws_url::resolve_socket_url(&self.base, ws_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl { url: path.to_string(), reason: e.to_string() })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Map non-success statuses to `ApiError::Status`, keeping the server message.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);
    Err(ApiError::Status { status: status.as_u16(), message })
}
