//! Throttled, retrying HTTP access to the sports-data provider

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::backoff::{BackoffPolicy, Sleeper, TokioSleeper, parse_retry_after};
use crate::config::Config;
use crate::constants::HTTP_POOL_MAX_IDLE_PER_HOST;
use crate::error::AppError;

/// Creates the shared HTTP client with a request timeout and a small idle pool.
pub fn create_http_client_with_timeout(timeout_seconds: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE_PER_HOST)
        .build()
}

/// Result of a single HTTP attempt.
enum Attempt {
    Success(Value),
    RateLimited { retry_after: Option<Duration> },
    Failed(AppError),
}

/// The one path to the provider.
///
/// Every call waits the courtesy delay first, then retries 429s and transport
/// failures with capped exponential backoff. Calls are funneled through a
/// single gate, so sharing one fetcher between tasks keeps the request rate
/// the same as a sequential run.
pub struct RateLimitedFetcher {
    client: Client,
    policy: BackoffPolicy,
    sleeper: Arc<dyn Sleeper>,
    gate: Mutex<()>,
}

impl RateLimitedFetcher {
    pub fn new(client: Client, policy: BackoffPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            client,
            policy,
            sleeper,
            gate: Mutex::new(()),
        }
    }

    /// Production fetcher: configured timeout, retry settings and real sleeping.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::new(
            client,
            BackoffPolicy::from(&config.retry),
            Arc::new(TokioSleeper),
        ))
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// GETs `url` with query `params` and returns the JSON body.
    ///
    /// Makes at most `max_retries` attempts. Fails with
    /// [`AppError::ApiRateLimit`] when the last attempt was answered with 429,
    /// otherwise with the last transport error.
    #[instrument(skip(self, params))]
    pub async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<Value, AppError> {
        let _turn = self.gate.lock().await;
        self.sleeper.sleep(self.policy.request_delay).await;

        let max_attempts = self.policy.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            let wait = match self.attempt(url, params).await {
                Attempt::Success(value) => {
                    if attempt > 1 {
                        info!("Fetched {url} after {attempt} attempts");
                    }
                    return Ok(value);
                }
                Attempt::RateLimited { retry_after } => {
                    last_error = Some(AppError::api_rate_limit(max_attempts, url));
                    self.policy
                        .rate_limit_delay(attempt, retry_after, self.jitter_sample())
                }
                Attempt::Failed(e) if e.is_transport() => {
                    let wait = self.policy.transport_delay(attempt, self.jitter_sample());
                    last_error = Some(e);
                    wait
                }
                Attempt::Failed(e) => return Err(e),
            };

            if attempt == max_attempts {
                break;
            }
            warn!(
                "Request to {} failed (attempt {}/{}), retrying in {:?}",
                url, attempt, max_attempts, wait
            );
            self.sleeper.sleep(wait).await;
        }

        let error = last_error.unwrap_or_else(|| AppError::api_rate_limit(max_attempts, url));
        error!("Giving up on {url}: {error}");
        Err(error)
    }

    fn jitter_sample(&self) -> f64 {
        if self.policy.max_jitter.is_zero() {
            0.0
        } else {
            rand::random::<f64>()
        }
    }

    async fn attempt(&self, url: &str, params: &[(&str, &str)]) -> Attempt {
        let response = match self.client.get(url).query(params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request error for {}: {}", url, e);
                return Attempt::Failed(if e.is_timeout() {
                    AppError::network_timeout(url)
                } else if e.is_connect() {
                    AppError::network_connection(url, e.to_string())
                } else {
                    AppError::ApiFetch(e)
                });
            }
        };

        let status = response.status();
        debug!("Response status: {status}");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|h| h.to_str().ok())
                .and_then(parse_retry_after);
            warn!("Rate limited by provider at {url} (Retry-After: {retry_after:?})");
            return Attempt::RateLimited { retry_after };
        }

        if !status.is_success() {
            let status_code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("Unknown error");
            warn!("HTTP {} - {} (URL: {})", status_code, reason, url);

            return Attempt::Failed(match status_code {
                404 => AppError::api_not_found(url),
                400..=499 => AppError::api_client_error(status_code, reason, url),
                502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
                _ => AppError::api_server_error(status_code, reason, url),
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Attempt::Failed(AppError::ApiFetch(e)),
        };
        debug!("Response length: {} bytes", body.len());

        if body.trim().is_empty() {
            return Attempt::Failed(AppError::api_malformed_json("Response body is empty", url));
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Attempt::Success(value),
            Err(e) => {
                let preview: String = body.chars().take(200).collect();
                warn!("Invalid JSON from {}: {} (body starts: {})", url, e, preview);
                Attempt::Failed(AppError::api_malformed_json(e.to_string(), url))
            }
        }
    }
}

impl std::fmt::Debug for RateLimitedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedFetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::RecordingSleeper;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_policy() -> BackoffPolicy {
        BackoffPolicy {
            request_delay: Duration::from_millis(350),
            max_retries: 4,
            rate_limit_cap: Duration::from_secs(30),
            transport_cap: Duration::from_secs(20),
            max_jitter: Duration::ZERO,
        }
    }

    fn fetcher_with(policy: BackoffPolicy) -> (RateLimitedFetcher, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = create_http_client_with_timeout(5).unwrap();
        (
            RateLimitedFetcher::new(client, policy, sleeper.clone()),
            sleeper,
        )
    }

    #[tokio::test]
    async fn test_fetch_success_sends_params_after_courtesy_delay() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/searchteams.php"))
            .and(query_param("t", "New York Knicks"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "teams": [{ "idTeam": "134862" }] })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let (fetcher, sleeper) = fetcher_with(test_policy());
        let url = format!("{}/searchteams.php", mock_server.uri());
        let body = fetcher.fetch(&url, &[("t", "New York Knicks")]).await.unwrap();

        assert_eq!(body["teams"][0]["idTeam"], "134862");
        assert_eq!(sleeper.waits(), vec![Duration::from_millis(350)]);
    }

    #[tokio::test]
    async fn test_sustained_429_raises_rate_limited() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(4)
            .mount(&mock_server)
            .await;

        let (fetcher, sleeper) = fetcher_with(test_policy());
        let url = format!("{}/eventslast.php", mock_server.uri());
        let err = fetcher.fetch(&url, &[("id", "1")]).await.unwrap_err();

        assert!(err.is_rate_limited());
        // Courtesy delay, then 1s, 2s, 4s between four attempts
        assert_eq!(
            sleeper.waits(),
            vec![
                Duration::from_millis(350),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_after_header_is_honoured_and_clamped() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "3600"))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "events": [] })))
            .mount(&mock_server)
            .await;

        let (fetcher, sleeper) = fetcher_with(test_policy());
        let url = format!("{}/eventsnext.php", mock_server.uri());
        let body = fetcher.fetch(&url, &[("id", "1")]).await.unwrap();

        assert_eq!(body, json!({ "events": [] }));
        assert_eq!(
            sleeper.waits(),
            vec![
                Duration::from_millis(350),
                Duration::from_secs(7),
                Duration::from_secs(30),
            ]
        );
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_to_last_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(4)
            .mount(&mock_server)
            .await;

        let (fetcher, _sleeper) = fetcher_with(test_policy());
        let url = format!("{}/eventspastleague.php", mock_server.uri());
        let err = fetcher.fetch(&url, &[("id", "4387")]).await.unwrap_err();

        assert!(err.is_transport());
        assert!(matches!(
            err,
            AppError::ApiServiceUnavailable { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_json_is_retried_then_succeeds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": null })))
            .mount(&mock_server)
            .await;

        let (fetcher, sleeper) = fetcher_with(test_policy());
        let url = format!("{}/eventslast.php", mock_server.uri());
        let body = fetcher.fetch(&url, &[("id", "1")]).await.unwrap();

        assert_eq!(body, json!({ "results": null }));
        assert_eq!(sleeper.waits().len(), 2);
    }

    #[tokio::test]
    async fn test_single_attempt_budget_never_sleeps_after_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut policy = test_policy();
        policy.max_retries = 1;
        let (fetcher, sleeper) = fetcher_with(policy);
        let url = format!("{}/searchteams.php", mock_server.uri());
        let err = fetcher.fetch(&url, &[("t", "x")]).await.unwrap_err();

        assert!(matches!(err, AppError::ApiNotFound { .. }));
        assert_eq!(sleeper.waits(), vec![Duration::from_millis(350)]);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let (fetcher, _sleeper) = fetcher_with(BackoffPolicy::immediate(2));
        // Nothing listens on port 9 locally
        let err = fetcher
            .fetch("http://127.0.0.1:9/searchteams.php", &[("t", "x")])
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(!err.is_rate_limited());
    }
}
