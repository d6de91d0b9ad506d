//! URL reachability check.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const TIMEOUT: Duration = Duration::from_secs(15);

/// Whether `url` is an http(s) URL answering with a non-error status.
///
/// Tries `HEAD` first and falls back to `GET` for hosts that reject it.
/// Sends the desktop user agent; see [`is_working_url_with`] for custom headers.
pub fn is_working_url(url: &str) -> bool {
    let headers = HashMap::from([(
        USER_AGENT.as_str().to_string(),
        crate::options::DESKTOP_USER_AGENT.to_string(),
    )]);
    is_working_url_with(url, &headers)
}

/// [`is_working_url`] sending `headers` with both requests.
///
/// Entries that are not valid HTTP headers are skipped with a warning.
pub fn is_working_url_with(url: &str, headers: &HashMap<String, String>) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
        Ok(parsed) => {
            tracing::debug!(url, scheme = parsed.scheme(), "unsupported url scheme");
            return false;
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "unparsable url");
            return false;
        }
    };

    let client = match Client::builder()
        .timeout(TIMEOUT)
        .default_headers(header_map(headers))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "failed to build http client");
            return false;
        }
    };

    let answered = |resp: reqwest::Result<reqwest::blocking::Response>| match resp {
        Ok(resp) => {
            tracing::debug!(url, status = %resp.status(), "url answered");
            !(resp.status().is_client_error() || resp.status().is_server_error())
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "url request failed");
            false
        }
    };

    answered(client.head(parsed.clone()).send()) || answered(client.get(parsed).send())
}

fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());

    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid http header"),
        }
    }

    map
}

/// Local server answering 200 only to requests carrying `user_agent`, 403 otherwise.
#[cfg(test)]
pub(crate) fn serve_for_user_agent(user_agent: &'static str) -> String {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let wanted = format!("user-agent: {}", user_agent.to_ascii_lowercase());

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut matched = false;
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 {
                let header = line.trim_end().to_ascii_lowercase();
                if header.is_empty() {
                    break;
                }
                matched |= header == wanted;
                line.clear();
            }

            let status = if matched { "200 OK" } else { "403 Forbidden" };
            let _ = write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
        }
    });

    format!("http://{addr}/watch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(!is_working_url(""));
        assert!(!is_working_url("not a url"));
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(!is_working_url("ftp://example.com/file"));
        assert!(!is_working_url("file:///etc/hosts"));
    }

    #[test]
    fn rejects_unresolvable_host() {
        assert!(!is_working_url("https://does-not-exist.invalid/watch?v=x"));
    }

    #[test]
    fn configured_user_agent_is_sent() {
        let url = serve_for_user_agent("custom/1.0");
        let custom = HashMap::from([("User-Agent".to_string(), "custom/1.0".to_string())]);

        assert!(is_working_url_with(&url, &custom));
        assert!(!is_working_url(&url));
        assert!(!is_working_url_with(&url, &HashMap::new()));
    }

    #[test]
    fn invalid_headers_are_skipped() {
        let url = serve_for_user_agent("custom/1.0");
        let headers = HashMap::from([
            ("User-Agent".to_string(), "custom/1.0".to_string()),
            ("bad header".to_string(), "x".to_string()),
            ("X-Token".to_string(), "line\nbreak".to_string()),
        ]);

        assert_eq!(header_map(&headers).len(), 1);
        assert!(is_working_url_with(&url, &headers));
    }
}
