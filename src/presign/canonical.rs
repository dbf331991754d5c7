use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;
use std::fmt;

/// Everything except the RFC 3986 unreserved characters.
pub const QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const PATH_ENCODE_SET: AsciiSet = QUERY_ENCODE_SET.remove(b'/');

pub fn encode(value: &str) -> String {
    utf8_percent_encode(value, &QUERY_ENCODE_SET).to_string()
}

/// Splits a raw query string into decoded key/value pairs, keeping their order.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (
                percent_decode_str(key).decode_utf8_lossy().into_owned(),
                percent_decode_str(value).decode_utf8_lossy().into_owned(),
            )
        })
        .collect()
}

/// Encodes decoded pairs back into a query string, in the given order.
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Header set keyed by lower-cased name. Values are trimmed, inner runs of
/// whitespace collapse to one space and repeated headers join with `,`.
#[derive(Debug, Default)]
pub struct CanonicalHeaders(BTreeMap<String, Vec<String>>);

impl CanonicalHeaders {
    pub fn insert(&mut self, name: &str, value: &str) {
        self.0
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    /// Sorted header names joined by `;`.
    pub fn signed_headers(&self) -> String {
        self.0.keys().map(String::as_str).collect::<Vec<_>>().join(";")
    }
}

impl fmt::Display for CanonicalHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.0 {
            writeln!(f, "{name}:{}", values.join(","))?;
        }
        Ok(())
    }
}

pub struct CanonicalRequest<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a [(String, String)],
    pub headers: &'a CanonicalHeaders,
    pub payload_hash: &'a str,
}

impl CanonicalRequest<'_> {
    fn canonical_uri(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            utf8_percent_encode(self.path, &PATH_ENCODE_SET).to_string()
        }
    }

    /// Encoded pairs sorted by key, then by value.
    fn canonical_query(&self) -> String {
        let mut pairs: Vec<(String, String)> = self
            .query
            .iter()
            .map(|(key, value)| (encode(key), encode(value)))
            .collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for CanonicalRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.canonical_uri())?;
        writeln!(f, "{}", self.canonical_query())?;
        writeln!(f, "{}", self.headers)?;
        writeln!(f, "{}", self.headers.signed_headers())?;
        write!(f, "{}", self.payload_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_everything_but_unreserved() {
        assert_eq!(encode("AKID/20150830/us-east-1"), "AKID%2F20150830%2Fus-east-1");
        assert_eq!(encode("host;x-k8s-aws-id"), "host%3Bx-k8s-aws-id");
        assert_eq!(encode("a+b=c d~e"), "a%2Bb%3Dc%20d~e");
    }

    #[test]
    fn parses_and_decodes_query() {
        assert_eq!(
            parse_query("Action=GetCallerIdentity&X-Amz-SignedHeaders=host%3Bx-k8s-aws-id&flag"),
            vec![
                ("Action".to_string(), "GetCallerIdentity".to_string()),
                ("X-Amz-SignedHeaders".to_string(), "host;x-k8s-aws-id".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn headers_are_lowercased_sorted_and_normalized() {
        let mut headers = CanonicalHeaders::default();
        headers.insert("X-K8s-Aws-Id", "  my   cluster ");
        headers.insert("host", "sts.us-east-1.amazonaws.com");
        headers.insert("x-amz-meta", "b");
        headers.insert("X-Amz-Meta", "a");
        assert_eq!(headers.signed_headers(), "host;x-amz-meta;x-k8s-aws-id");
        assert_eq!(
            headers.to_string(),
            "host:sts.us-east-1.amazonaws.com\nx-amz-meta:b,a\nx-k8s-aws-id:my cluster\n"
        );
    }

    #[test]
    fn canonical_request_sorts_query_by_key_then_value() {
        let mut headers = CanonicalHeaders::default();
        headers.insert("host", "example.amazonaws.com");
        let query = vec![
            ("Param2".to_string(), "value2".to_string()),
            ("Param1".to_string(), "value2".to_string()),
            ("Param1".to_string(), "value1".to_string()),
        ];
        let creq = CanonicalRequest {
            method: "GET",
            path: "",
            query: &query,
            headers: &headers,
            payload_hash: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        };
        assert_eq!(
            creq.to_string(),
            "GET\n/\nParam1=value1&Param1=value2&Param2=value2\nhost:example.amazonaws.com\n\nhost\ne3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
