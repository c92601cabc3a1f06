//! HTTP [`Api`] implementation.

mod impls;

use std::{sync::Arc, time::Duration};

use derive_more::Debug;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracerr::Traced;
use tracing as log;
use url::Url;

#[cfg(doc)]
use crate::infra::Api;
use crate::{domain::user::session, infra::api};

/// [`Http`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base [`Url`] every endpoint path is resolved against.
    pub base_url: Url,

    /// Timeout of a whole request, if any.
    pub timeout: Option<Duration>,
}

/// REST [`Api`] client over HTTP.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying [`reqwest::Client`].
    client: reqwest::Client,

    /// Base [`Url`] of the API, always ending with `/`.
    base_url: Url,

    /// Default `Authorization: Bearer` [`session::Token`].
    #[debug(skip)]
    token: Arc<RwLock<Option<session::Token>>>,
}

impl Http {
    /// Creates a new [`Http`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the underlying [`reqwest::Client`] cannot be built.
    pub fn new(conf: Config) -> Result<Self, Traced<api::Error>> {
        let Config {
            mut base_url,
            timeout,
        } = conf;

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client =
            builder.build().map_err(tracerr::from_and_wrap!(=> api::Error))?;

        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns the base [`Url`] of this [`Http`] client.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replaces the default `Authorization` [`session::Token`].
    async fn authorize(&self, token: Option<session::Token>) {
        *self.token.write().await = token;
    }

    /// Prepares a request to the provided endpoint `path`, authorized with the
    /// current [`session::Token`], if any.
    async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, Traced<api::Error>> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(tracerr::from_and_wrap!(=> api::Error))?;
        log::debug!("{method} {url}");

        let req = self.client.request(method, url);
        Ok(match self.token.read().await.as_ref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        })
    }

    /// Sends the provided request, turning non-successful statuses into
    /// [`api::Error::Status`].
    async fn send(
        &self,
        req: RequestBuilder,
    ) -> Result<reqwest::Response, Traced<api::Error>> {
        let resp = req
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> api::Error))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.bytes().await.unwrap_or_default();
        let mut failure = api::Status::new(status.as_u16());
        failure.message = message_of(&body);
        log::debug!("API call failed with {failure}");

        Err(tracerr::new!(api::Error::Status(failure)))
    }

    /// Sends the provided request and decodes its JSON response body.
    async fn json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<T, Traced<api::Error>> {
        let body = self
            .send(req)
            .await
            .map_err(tracerr::wrap!())?
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!(=> api::Error))?;
        serde_json::from_slice(&body)
            .map_err(tracerr::from_and_wrap!(=> api::Error))
    }

    /// `GET`s the provided endpoint `path`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, Traced<api::Error>> {
        let req = self
            .request(Method::GET, path)
            .await
            .map_err(tracerr::wrap!())?;
        self.json(req).await.map_err(tracerr::wrap!())
    }

    /// Sends the provided JSON `body` to the provided endpoint `path`.
    async fn submit<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, Traced<api::Error>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self
            .request(method, path)
            .await
            .map_err(tracerr::wrap!())?
            .json(body);
        self.json(req).await.map_err(tracerr::wrap!())
    }

    /// `DELETE`s the resource at the provided endpoint `path`, ignoring the
    /// response body.
    async fn delete(&self, path: &str) -> Result<(), Traced<api::Error>> {
        let req = self
            .request(Method::DELETE, path)
            .await
            .map_err(tracerr::wrap!())?;
        self.send(req).await.map_err(tracerr::wrap!()).map(drop)
    }
}

/// Extracts the human-readable `message` of an error response body.
///
/// Validation failures may carry a list of messages, which are joined.
fn message_of(body: &[u8]) -> Option<String> {
    let json = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    match json.get("message")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(all) => {
            let joined = all
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            (!joined.is_empty()).then_some(joined)
        }
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Number(_)
        | serde_json::Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::{message_of, Config, Http};

    #[test]
    fn extracts_server_messages() {
        assert_eq!(
            message_of(br#"{"message":"Slot unavailable"}"#).as_deref(),
            Some("Slot unavailable"),
        );
        assert_eq!(
            message_of(br#"{"message":["email must be an email","x"]}"#)
                .as_deref(),
            Some("email must be an email; x"),
        );
        assert_eq!(message_of(br#"{"error":"Bad Request"}"#), None);
        assert_eq!(message_of(b"<html>"), None);
    }

    #[test]
    fn normalizes_base_url() {
        let http = Http::new(Config {
            base_url: Url::parse("https://api.aabb.example/v1").unwrap(),
            timeout: None,
        })
        .unwrap();

        assert_eq!(http.base_url().as_str(), "https://api.aabb.example/v1/");
        assert_eq!(
            http.base_url().join("reservations/me").unwrap().as_str(),
            "https://api.aabb.example/v1/reservations/me",
        );
    }
}
