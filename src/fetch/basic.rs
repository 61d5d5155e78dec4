use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("station_traffic/", env!("CARGO_PKG_VERSION"));

/// A plain `reqwest` client with a crate user agent and a request timeout.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
