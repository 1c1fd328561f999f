//! HTTP access to the portal with retry on transport failures.
//!
//! All requests of a run go through one [`DivaClient`]. A request that fails before a status line
//! is received (connection refused, timeout, DNS) is retried with exponential backoff. Any status
//! other than `200 OK` is returned as [`DivaError::UpstreamStatus`] straight away.

use backon::{ExponentialBuilder, Retryable};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::*;

/// Thin wrapper over [`reqwest::Client`] carrying the retry policy.
#[derive(Debug, Clone)]
pub struct DivaClient {
  /// The underlying client, built with the configured headers and timeout
  http:    reqwest::Client,
  /// Retry policy for transient failures
  backoff: ExponentialBuilder,
}

impl DivaClient {
  /// Builds a client from the `http` and `backoff` sections of the configuration.
  pub fn new(config: &Config) -> Result<Self> {
    let mut headers = HeaderMap::new();
    for (key, value) in &config.http.headers {
      let name = HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| DivaError::Config(format!("invalid header name {key}: {e}")))?;
      let value = HeaderValue::from_str(value)
        .map_err(|e| DivaError::Config(format!("invalid value for header {key}: {e}")))?;
      headers.insert(name, value);
    }

    let mut builder =
      reqwest::Client::builder().user_agent(config.http.user_agent.as_str()).default_headers(headers);
    if let Some(timeout) = config.http.timeout() {
      builder = builder.timeout(timeout);
    }

    Ok(Self { http: builder.build()?, backoff: backoff_policy(&config.backoff) })
  }

  /// Fetches `url` and returns the body, retrying transport failures.
  pub async fn get_text(&self, url: &Url) -> Result<String> {
    (|| self.get_once(url))
      .retry(self.backoff.clone())
      .sleep(tokio::time::sleep)
      .when(DivaError::is_transient)
      .notify(|err: &DivaError, delay: Duration| {
        warn!(url = %url, delay = ?delay, error = %err, "retrying request");
      })
      .await
  }

  /// One attempt at fetching `url`.
  async fn get_once(&self, url: &Url) -> Result<String> {
    debug!("Fetching {url}");
    let response = self.http.get(url.clone()).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(DivaError::UpstreamStatus { status: status.as_u16(), url: url.to_string() });
    }

    let body = response.text().await?;
    trace!("Response from {url}: {body}");
    Ok(body)
  }
}

/// Translates the configured backoff into a [`backon`] policy.
fn backoff_policy(config: &BackoffConfig) -> ExponentialBuilder {
  let mut backoff = ExponentialBuilder::default()
    .with_min_delay(Duration::from_millis(config.min_delay_ms))
    .with_max_delay(Duration::from_millis(config.max_delay_ms))
    .with_factor(config.factor);
  if config.jitter {
    backoff = backoff.with_jitter();
  }
  match config.max_retries {
    Some(times) => backoff.with_max_times(times),
    None => backoff.without_max_times(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rejects_invalid_header() {
    let mut config = Config::default();
    config.http.headers.insert("bad header".into(), "value".into());
    assert!(matches!(DivaClient::new(&config), Err(DivaError::Config(_))));
  }

  #[traced_test]
  #[tokio::test]
  async fn test_connection_refused_is_retried_then_surfaced() {
    let mut config = Config::default().with_max_retries(Some(2));
    config.backoff.min_delay_ms = 1;
    config.backoff.max_delay_ms = 2;
    config.backoff.jitter = false;
    let client = DivaClient::new(&config).unwrap();

    // nothing listens on the discard port
    let url = Url::parse("http://127.0.0.1:9/").unwrap();
    let err = client.get_text(&url).await.unwrap_err();

    assert!(err.is_transient(), "expected a transport error, got {err}");
    assert!(logs_contain("retrying request"));
  }
}
