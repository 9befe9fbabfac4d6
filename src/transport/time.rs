//! Server time operation, doubling as the region health check.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;
use crate::region::Operation;
use crate::transport::client::RestRegion;

/// Server time of a region, as a timetoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeResponse {
    pub timetoken: u64,
}

/// `[<timetoken>]`
#[derive(Debug, Deserialize)]
struct TimeBody((u64,));

/// Fetch the server time of one region.
#[derive(Debug, Clone)]
pub struct Time {
    region: Arc<RestRegion>,
}

impl Time {
    pub(crate) fn new(region: Arc<RestRegion>) -> Self {
        Self { region }
    }
}

impl Operation for Time {
    type Output = TimeResponse;

    fn execute(&self) -> BoxFuture<'_, Outcome<TimeResponse>> {
        fetch(&self.region).boxed()
    }
}

pub(crate) async fn fetch(region: &RestRegion) -> Outcome<TimeResponse> {
    let url = region.url(&["time", "0"]);
    region
        .get_json::<TimeBody>(url)
        .await
        .and_then(|TimeBody((timetoken,))| Outcome::success(TimeResponse { timetoken }))
}
