#![allow(dead_code)]

use batchnews::{JobConfig, JobConfigBuilder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_PROJECT: &str = "test-project";

/// Builds a config pointing the news client at the mock server.
pub fn test_config(server: &MockServer) -> JobConfig {
    JobConfigBuilder::new()
        .api_key(TEST_API_KEY.to_string())
        .project_id(TEST_PROJECT.to_string())
        .news_api_url(server.uri())
        .build()
        .expect("test config should be valid")
}

/// Mounts a `top-headlines` responder that only matches the expected query.
pub async fn mount_top_headlines(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("country", "us"))
        .and(query_param("apiKey", TEST_API_KEY))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}
