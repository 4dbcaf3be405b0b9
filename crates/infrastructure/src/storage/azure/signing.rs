//! Shared Key request signing
//!
//! Builds the canonical string-to-sign for the Blob service and signs it
//! with HMAC-SHA256 keyed by the decoded account key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::BTreeMap;
use url::Url;

type HmacSha256 = Hmac<Sha256>;

/// REST API version sent with every request
pub const API_VERSION: &str = "2021-08-06";

/// Request parts that take part in the signature
#[derive(Debug)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub url: &'a Url,
    pub content_length: usize,
    pub content_type: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
    /// `x-ms-*` headers, names lower case
    pub ms_headers: &'a BTreeMap<String, String>,
}

#[derive(Clone)]
pub struct SharedKeyCredential {
    account_name: String,
    account_key: Vec<u8>,
}

impl std::fmt::Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

impl SharedKeyCredential {
    pub fn new(account_name: impl Into<String>, account_key: Vec<u8>) -> Self {
        Self {
            account_name: account_name.into(),
            account_key,
        }
    }

    /// Value of the `Authorization` header for the request
    pub fn authorization(&self, request: &SignableRequest<'_>) -> String {
        let signature = self.sign(&self.string_to_sign(request));
        format!("SharedKey {}:{}", self.account_name, signature)
    }

    pub fn string_to_sign(&self, request: &SignableRequest<'_>) -> String {
        let content_length = if request.content_length == 0 {
            String::new()
        } else {
            request.content_length.to_string()
        };

        let standard_headers = [
            request.method,
            "", // Content-Encoding
            "", // Content-Language
            content_length.as_str(),
            "", // Content-MD5
            request.content_type.unwrap_or(""),
            "", // Date, superseded by x-ms-date
            "", // If-Modified-Since
            "", // If-Match
            request.if_none_match.unwrap_or(""),
            "", // If-Unmodified-Since
            "", // Range
        ];

        let mut out = standard_headers.join("\n");
        out.push('\n');
        for (name, value) in request.ms_headers {
            out.push_str(name);
            out.push(':');
            out.push_str(value.trim());
            out.push('\n');
        }
        out.push_str(&self.canonicalized_resource(request.url));
        out
    }

    fn canonicalized_resource(&self, url: &Url) -> String {
        let mut resource = format!("/{}{}", self.account_name, url.path());

        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in url.query_pairs() {
            params
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(value.into_owned());
        }
        for (name, mut values) in params {
            values.sort();
            resource.push('\n');
            resource.push_str(&name);
            resource.push(':');
            resource.push_str(&values.join(","));
        }
        resource
    }

    pub fn sign(&self, string_to_sign: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.account_key)
            .expect("HMAC accepts any key length");
        mac.update(string_to_sign.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// RFC 1123 timestamp for the `x-ms-date` header
pub fn ms_date(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn credential() -> SharedKeyCredential {
        SharedKeyCredential::new(
            "testaccount",
            STANDARD
                .decode("YmxvYi1sb2ctdGVzdC1rZXktMDEyMzQ1Njc4OWFiY2RlZg==")
                .unwrap(),
        )
    }

    fn ms_headers() -> BTreeMap<String, String> {
        let date = chrono::Utc
            .with_ymd_and_hms(2024, 3, 15, 9, 30, 5)
            .single()
            .unwrap();
        BTreeMap::from([
            ("x-ms-date".to_string(), ms_date(date)),
            ("x-ms-version".to_string(), API_VERSION.to_string()),
        ])
    }

    #[test]
    fn test_ms_date_format() {
        assert_eq!(ms_headers()["x-ms-date"], "Fri, 15 Mar 2024 09:30:05 GMT");
    }

    #[test]
    fn test_string_to_sign_for_container_get() {
        let url = Url::parse("https://testaccount.blob.core.windows.net/logs?restype=container")
            .unwrap();
        let headers = ms_headers();
        let request = SignableRequest {
            method: "GET",
            url: &url,
            content_length: 0,
            content_type: None,
            if_none_match: None,
            ms_headers: &headers,
        };

        assert_eq!(
            credential().string_to_sign(&request),
            "GET\n\n\n\n\n\n\n\n\n\n\n\n\
             x-ms-date:Fri, 15 Mar 2024 09:30:05 GMT\n\
             x-ms-version:2021-08-06\n\
             /testaccount/logs\nrestype:container"
        );
    }

    #[test]
    fn test_authorization_header() {
        let url = Url::parse("https://testaccount.blob.core.windows.net/logs?restype=container")
            .unwrap();
        let headers = ms_headers();
        let request = SignableRequest {
            method: "GET",
            url: &url,
            content_length: 0,
            content_type: None,
            if_none_match: None,
            ms_headers: &headers,
        };

        assert_eq!(
            credential().authorization(&request),
            "SharedKey testaccount:BCpZ7429fNVVa7vgBjrWtc5reQwzEJ3iZ9h3+kfCwzo="
        );
    }

    #[test]
    fn test_put_blob_includes_length_type_and_condition() {
        let url = Url::parse("http://127.0.0.1:10000/devstoreaccount1/logs/run.log").unwrap();
        let mut headers = ms_headers();
        headers.insert("x-ms-blob-type".to_string(), "BlockBlob".to_string());
        let request = SignableRequest {
            method: "PUT",
            url: &url,
            content_length: 42,
            content_type: Some("text/plain; charset=utf-8"),
            if_none_match: Some("*"),
            ms_headers: &headers,
        };

        let sts = SharedKeyCredential::new("devstoreaccount1", vec![1, 2, 3]).string_to_sign(&request);
        let lines: Vec<&str> = sts.split('\n').collect();
        assert_eq!(lines[0], "PUT");
        assert_eq!(lines[3], "42");
        assert_eq!(lines[5], "text/plain; charset=utf-8");
        assert_eq!(lines[9], "*");
        assert_eq!(lines[12], "x-ms-blob-type:BlockBlob");
        assert_eq!(
            lines.last().copied(),
            Some("/devstoreaccount1/devstoreaccount1/logs/run.log")
        );
    }

    #[test]
    fn test_sign_accepts_empty_and_oversized_keys() {
        for key in [Vec::new(), vec![7u8; 200]] {
            let digest = SharedKeyCredential::new("testaccount", key).sign("GET\n");
            assert_eq!(STANDARD.decode(&digest).unwrap().len(), 32);
        }
    }
}
