//! Captured requests and their ammo formats
//!
//! A captured request can be rendered in the four ammo formats the phantom
//! load generator reads: `uri` (GET), `uripost` (POST), `raw` and `httpjson`.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, Method, Uri, Version, header};
use serde::Serialize;

/// Extensions treated as static content
pub const STATIC_EXTENSIONS: [&str; 10] = [
    "css", "js", "jpeg", "jpg", "png", "gif", "ico", "svg", "woff", "woff2",
];

/// A client request as the dispatcher saw it
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRequest {
    /// Host the request is forwarded to
    pub host: String,
    /// Path and query as sent by the client
    pub uri: String,
    pub method: String,
    pub protocol: String,
    /// Declared body length; -1 when the body was streamed without one
    pub content_length: i64,
    /// Header values keyed by canonical name, without Host and Referer
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: Bytes,
}

#[derive(Serialize)]
struct HttpJson<'a> {
    host: &'a str,
    uri: &'a str,
    method: &'a str,
    tag: String,
    headers: BTreeMap<&'a str, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    body: String,
}

impl CapturedRequest {
    /// Captures an incoming request
    ///
    /// `target` overrides the host the client addressed.
    pub fn capture(
        method: &Method,
        uri: &Uri,
        version: Version,
        headers: &HeaderMap,
        body: Bytes,
        target: Option<&str>,
    ) -> Self {
        let mut captured: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in headers {
            if *name == header::HOST || *name == header::REFERER {
                continue;
            }
            captured
                .entry(canonical_name(name))
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let host = match target {
            Some(target) => target.to_string(),
            None => headers
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .or_else(|| uri.authority().map(|a| a.to_string()))
                .unwrap_or_default(),
        };

        let declared = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());
        let content_length = match declared {
            Some(n) => n,
            None if headers.contains_key(header::TRANSFER_ENCODING) => -1,
            None => 0,
        };

        Self {
            host,
            uri: uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
            method: method.as_str().to_string(),
            protocol: format!("{:?}", version),
            content_length,
            headers: captured,
            body,
        }
    }

    /// URL of the same request on the upstream host
    pub fn upstream_url(&self, scheme: &str) -> String {
        format!("{}://{}{}", scheme, self.host, self.uri)
    }

    /// Whether the whole declared body was received
    pub fn is_complete(&self) -> bool {
        self.body.len() as i64 == self.content_length
    }

    fn path(&self) -> &str {
        self.uri.split_once('?').map_or(self.uri.as_str(), |(path, _)| path)
    }

    /// Whether the path points at a static file
    pub fn is_static(&self) -> bool {
        self.path()
            .rsplit_once('.')
            .is_some_and(|(_, ext)| STATIC_EXTENSIONS.contains(&ext))
    }

    /// Ammo tag: `root` for `/`, otherwise method and path, e.g. `get_api_items`
    pub fn tag(&self) -> String {
        if self.uri == "/" {
            return "root".to_string();
        }
        format!("{}{}", self.method.to_lowercase(), self.path().replace('/', "_"))
    }

    /// One `[Name: value]` line per header, Host first when not captured
    fn header_block(&self) -> String {
        let mut lines = Vec::with_capacity(self.headers.len() + 1);
        if !self.headers.contains_key("Host") {
            lines.push(format!("[Host: {}]", self.host));
        }
        for (name, values) in &self.headers {
            lines.push(format!("[{}: {}]", name, values.join(", ")));
        }
        lines.join("\n")
    }

    /// `uri` ammo; GET requests only
    pub fn format_uri(&self) -> Option<Vec<u8>> {
        if self.method != Method::GET.as_str() {
            return None;
        }
        Some(format!("{}\r\n{} {}\r\n", self.header_block(), self.uri, self.tag()).into_bytes())
    }

    /// `uripost` ammo; POST requests only
    pub fn format_uri_post(&self) -> Option<Vec<u8>> {
        if self.method != Method::POST.as_str() {
            return None;
        }
        let mut out = format!(
            "{}\r\n{} {}\r\n",
            self.header_block(),
            self.content_length,
            self.uri
        )
        .into_bytes();
        out.extend_from_slice(&self.body);
        out.extend_from_slice(b"\r\n");
        Some(out)
    }

    /// `raw` ammo: the full HTTP request prefixed by its size and tag
    pub fn format_raw(&self) -> Vec<u8> {
        let headers = self.header_block().replace(['[', ']'], "");
        let mut raw = format!(
            "{} {} {}\r\n{}\r\n\r\n",
            self.method, self.uri, self.protocol, headers
        )
        .into_bytes();
        raw.extend_from_slice(&self.body);

        let mut out = format!("{} {}\n", raw.len(), self.tag()).into_bytes();
        out.extend_from_slice(&raw);
        out.extend_from_slice(b"\r\n");
        out
    }

    /// `httpjson` ammo: one JSON object per request
    pub fn format_http_json(&self) -> serde_json::Result<Vec<u8>> {
        let ammo = HttpJson {
            host: &self.host,
            uri: &self.uri,
            method: &self.method,
            tag: self.tag(),
            headers: self
                .headers
                .iter()
                .map(|(name, values)| (name.as_str(), values.join(", ")))
                .collect(),
            body: String::from_utf8_lossy(&self.body).into_owned(),
        };
        serde_json::to_vec(&ammo)
    }
}

/// `content-type` -> `Content-Type`
fn canonical_name(name: &HeaderName) -> String {
    name.as_str()
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
