use drive_ox_common::request_builder::{
    AuthMethod, Endpoint, RequestBuilder, RequestConfig,
};
use serde::{Deserialize, Serialize};

use crate::error::DriveRequestError;

/// Name of the session cookie the server issues.
pub(crate) const SESSION_COOKIE: &str = "drive.sid";

/// Drive client helper methods using the common RequestBuilder
pub(crate) struct DriveRequestHelper {
    request_builder: RequestBuilder,
}

impl DriveRequestHelper {
    pub(crate) fn new(
        client: reqwest::Client,
        base_url: &str,
        token: &Option<String>,
        session_cookie: &Option<String>,
        headers: &std::collections::HashMap<String, String>,
    ) -> Self {
        let mut config = RequestConfig::new(base_url);

        // Bearer token wins over the session cookie when both are set.
        if let Some(token) = token {
            config = config.with_auth(AuthMethod::Bearer(token.clone()));
        } else if let Some(cookie) = session_cookie {
            config = config.with_auth(AuthMethod::Cookie {
                name: SESSION_COOKIE.to_string(),
                value: cookie.clone(),
            });
        }

        for (key, value) in headers {
            config = config.with_header(key.clone(), value.clone());
        }

        let request_builder = RequestBuilder::new(client, config);

        Self { request_builder }
    }

    pub(crate) async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<T, DriveRequestError> {
        Ok(self.request_builder.request(endpoint).await?)
    }

    pub(crate) async fn request_optional<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &Endpoint,
    ) -> Result<Option<T>, DriveRequestError> {
        Ok(self.request_builder.request_optional(endpoint).await?)
    }

    pub(crate) async fn request_json<T: for<'de> Deserialize<'de>, B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<T, DriveRequestError> {
        Ok(self
            .request_builder
            .request_json(endpoint, Some(body))
            .await?)
    }

    pub(crate) async fn request_json_unit<B: Serialize>(
        &self,
        endpoint: &Endpoint,
        body: &B,
    ) -> Result<(), DriveRequestError> {
        Ok(self.request_builder.request_json_unit(endpoint, body).await?)
    }

    pub(crate) async fn request_unit(&self, endpoint: &Endpoint) -> Result<(), DriveRequestError> {
        Ok(self.request_builder.request_unit(endpoint).await?)
    }
}
