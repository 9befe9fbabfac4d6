//! REST region client.
//!
//! # Responsibilities
//! - Hold one HTTP client per region with its own timeouts
//! - Build request URLs against the region's origin
//! - Map transport results onto [`Status`] categories

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::RegionConfig;
use crate::error::{FailoverError, FailoverResult};
use crate::outcome::{Outcome, Status, StatusCategory};
use crate::region::{Connector, Endpoint};
use crate::transport::publish::Publish;
use crate::transport::time::Time;

/// One region of a REST messaging backend.
pub struct RestRegion {
    name: String,
    origin: Url,
    publish_key: String,
    subscribe_key: String,
    user_id: String,
    client: Client,
}

impl RestRegion {
    pub fn new(config: &RegionConfig) -> FailoverResult<Self> {
        let origin = Url::parse(&config.origin).map_err(|source| FailoverError::InvalidOrigin {
            region: config.name.clone(),
            source,
        })?;

        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("region-failover/", env!("CARGO_PKG_VERSION")));
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|source| FailoverError::Client {
            region: config.name.clone(),
            source,
        })?;

        Ok(Self {
            name: config.name.clone(),
            origin,
            publish_key: config.publish_key.clone(),
            subscribe_key: config.subscribe_key.clone(),
            user_id: config.user_id.clone(),
            client,
        })
    }

    /// Publish `message` to `channel` through this region.
    pub fn publish(self: &Arc<Self>, channel: impl Into<String>, message: serde_json::Value) -> Publish {
        Publish::new(self.clone(), channel.into(), message)
    }

    /// Fetch the server time from this region.
    pub fn time(self: &Arc<Self>) -> Time {
        Time::new(self.clone())
    }

    pub(crate) fn publish_key(&self) -> &str {
        &self.publish_key
    }

    pub(crate) fn subscribe_key(&self) -> &str {
        &self.subscribe_key
    }

    /// Origin URL extended with the given path segments (percent-encoded)
    /// and the client identity.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.origin.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut().append_pair("uuid", &self.user_id);
        url
    }

    /// Issue a GET and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Outcome<T> {
        tracing::trace!(region = %self.name, url = %url, "Sending request");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Outcome::failure(classify_error(&e)),
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => return Outcome::failure(classify_error(&e).with_status_code(status.as_u16())),
        };

        if !status.is_success() {
            let message = String::from_utf8_lossy(&body).into_owned();
            return Outcome::failure(classify_status(status).with_message(message));
        }

        match serde_json::from_slice(&body) {
            Ok(value) => Outcome::success(value),
            Err(e) => Outcome::failure(
                Status::error(StatusCategory::MalformedResponse)
                    .with_status_code(status.as_u16())
                    .with_message(e.to_string()),
            ),
        }
    }
}

impl Endpoint for RestRegion {
    fn name(&self) -> &str {
        &self.name
    }

    fn health_check(&self) -> BoxFuture<'_, Status> {
        async move { crate::transport::time::fetch(self).await.status }.boxed()
    }
}

impl std::fmt::Debug for RestRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestRegion")
            .field("name", &self.name)
            .field("origin", &self.origin.as_str())
            .finish()
    }
}

/// Builds [`RestRegion`]s from configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct RestConnector;

impl Connector for RestConnector {
    type Endpoint = RestRegion;

    fn connect(&self, config: &RegionConfig) -> FailoverResult<RestRegion> {
        RestRegion::new(config)
    }
}

fn classify_error(error: &reqwest::Error) -> Status {
    let category = if error.is_timeout() {
        StatusCategory::Timeout
    } else if error.is_connect() {
        StatusCategory::NetworkIssues
    } else if error.is_decode() || error.is_body() {
        StatusCategory::MalformedResponse
    } else {
        StatusCategory::Unknown
    };

    Status::error(category).with_message(error.to_string())
}

fn classify_status(status: StatusCode) -> Status {
    let category = match status {
        StatusCode::BAD_REQUEST => StatusCategory::BadRequest,
        StatusCode::FORBIDDEN => StatusCategory::AccessDenied,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => StatusCategory::Timeout,
        _ => StatusCategory::Unknown,
    };

    Status::error(category).with_status_code(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(origin: &str) -> RegionConfig {
        RegionConfig {
            name: "us-east".to_string(),
            origin: origin.to_string(),
            publish_key: "pub-key".to_string(),
            subscribe_key: "sub-key".to_string(),
            user_id: "tester".to_string(),
            ..RegionConfig::default()
        }
    }

    #[test]
    fn test_url_building_encodes_segments() {
        let region = RestRegion::new(&region("http://127.0.0.1:9000")).unwrap();
        let url = region.url(&["publish", "pub-key", "sub-key", "0", "my channel", "0", "\"hi\""]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/publish/pub-key/sub-key/0/my%20channel/0/%22hi%22?uuid=tester"
        );
    }

    #[test]
    fn test_url_keeps_origin_path_prefix() {
        let region = RestRegion::new(&region("https://gateway.example.com/pubsub/")).unwrap();
        let url = region.url(&["time", "0"]);
        assert_eq!(url.as_str(), "https://gateway.example.com/pubsub/time/0?uuid=tester");
    }

    #[test]
    fn test_invalid_origin() {
        let err = RestRegion::new(&region("::not a url::")).unwrap_err();
        assert!(matches!(err, FailoverError::InvalidOrigin { region, .. } if region == "us-east"));
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::FORBIDDEN).category(), StatusCategory::AccessDenied);
        assert_eq!(classify_status(StatusCode::BAD_REQUEST).category(), StatusCategory::BadRequest);
        assert_eq!(classify_status(StatusCode::GATEWAY_TIMEOUT).category(), StatusCategory::Timeout);

        let status = classify_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status.category(), StatusCategory::Unknown);
        assert_eq!(status.status_code(), Some(500));
        assert!(status.is_error());
    }
}
