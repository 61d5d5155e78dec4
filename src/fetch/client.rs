use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes one HTTP request. Wrapped so dataset downloads can be routed
/// through a configured or instrumented client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
