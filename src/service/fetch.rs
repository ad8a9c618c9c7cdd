use reqwest::Client;
use tracing::debug;

/// Issues a GET request and hands the raw body text to `on_ok`, invoked
/// only when the server answers 200. Any other status, and any transport
/// failure, is swallowed; the callback is simply never called.
///
/// Written against the service's plain-text GET endpoints. Nothing in the
/// binary calls it today.
pub async fn fetch_text<F>(client: &Client, url: &str, on_ok: F)
where
    F: FnOnce(String),
{
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!("GET {} failed: {}", url, err);
            return;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        debug!("GET {} returned {}", url, response.status());
        return;
    }

    match response.text().await {
        Ok(body) => on_ok(body),
        Err(err) => debug!("GET {} body read failed: {}", url, err),
    }
}
