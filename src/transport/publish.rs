//! Publish operation.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::outcome::{Outcome, Status, StatusCategory};
use crate::region::Operation;
use crate::transport::client::RestRegion;

/// Acknowledgement of a published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishResponse {
    pub timetoken: u64,
}

/// `[1, "Sent", "<timetoken>"]`
#[derive(Debug, Deserialize)]
struct PublishAck(i64, String, String);

/// Publish a JSON message to a channel on one region.
#[derive(Debug, Clone)]
pub struct Publish {
    region: Arc<RestRegion>,
    channel: String,
    message: serde_json::Value,
}

impl Publish {
    pub(crate) fn new(region: Arc<RestRegion>, channel: String, message: serde_json::Value) -> Self {
        Self {
            region,
            channel,
            message,
        }
    }
}

impl Operation for Publish {
    type Output = PublishResponse;

    fn execute(&self) -> BoxFuture<'_, Outcome<PublishResponse>> {
        async move {
            let payload = self.message.to_string();
            let url = self.region.url(&[
                "publish",
                self.region.publish_key(),
                self.region.subscribe_key(),
                "0",
                self.channel.as_str(),
                "0",
                payload.as_str(),
            ]);

            self.region.get_json::<PublishAck>(url).await.and_then(decode_ack)
        }
        .boxed()
    }
}

fn decode_ack(PublishAck(code, description, timetoken): PublishAck) -> Outcome<PublishResponse> {
    if code != 1 {
        return Outcome::failure(Status::error(StatusCategory::Unknown).with_message(description));
    }

    match timetoken.parse() {
        Ok(timetoken) => Outcome::success(PublishResponse { timetoken }),
        Err(_) => Outcome::failure(
            Status::error(StatusCategory::MalformedResponse)
                .with_message(format!("invalid timetoken '{}'", timetoken)),
        ),
    }
}
