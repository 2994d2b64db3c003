//! Request values handed to the executor.

use std::fmt;

use crate::types::ChangeBatch;

/// HTTP verbs used by the record-set API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of bodies the API accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// `ChangeResourceRecordSetsRequest`
    ChangeBatch(ChangeBatch),
}

/// One API call: verb, version-relative path, query and optional body.
///
/// Built by the domain layer and only read by the executor, so a retried
/// attempt sends exactly the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<RequestBody>,
}

impl Request {
    /// `path` is relative to the versioned base, e.g. `/hostedzone/Z1/rrset`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Full URL: `{endpoint}/{api_version}{path}[?query]`.
    pub(crate) fn url(&self, endpoint: &str, api_version: &str) -> String {
        let mut url = format!(
            "{}/{}{}",
            endpoint.trim_end_matches('/'),
            api_version,
            self.path
        );
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&encode_query(&self.query));
        }
        url
    }
}

fn encode_query(query: &[(String, String)]) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_query() {
        let req = Request::get("/hostedzone/Z1/rrset");
        assert_eq!(
            req.url("https://route53.amazonaws.com", "2012-12-12"),
            "https://route53.amazonaws.com/2012-12-12/hostedzone/Z1/rrset"
        );
    }

    #[test]
    fn url_trims_endpoint_slash() {
        let req = Request::get("/hostedzone");
        assert_eq!(
            req.url("http://127.0.0.1:8080/", "2013-04-01"),
            "http://127.0.0.1:8080/2013-04-01/hostedzone"
        );
    }

    #[test]
    fn url_encodes_query() {
        let req = Request::get("/hostedzone/Z1/rrset").with_query(vec![
            ("name".into(), "*.example.com.".into()),
            ("maxitems".into(), "10".into()),
        ]);
        assert_eq!(
            req.url("https://route53.amazonaws.com", "2012-12-12"),
            "https://route53.amazonaws.com/2012-12-12/hostedzone/Z1/rrset?name=%2A.example.com.&maxitems=10"
        );
    }

    #[test]
    fn post_carries_body() {
        let req = Request::post(
            "/hostedzone/Z1/rrset",
            RequestBody::ChangeBatch(ChangeBatch::default()),
        );
        assert_eq!(req.method(), Method::Post);
        assert!(req.body().is_some());
    }
}
