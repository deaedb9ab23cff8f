//! The request/response seam between the typed client and the network

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::error::Result;

/// HTTP methods used by the Forgejo API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read
    Get,
    /// Create
    Post,
    /// Partial update
    Patch,
    /// Remove
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

/// Path below `/api/v1`, kept as unencoded segments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiPath(Vec<String>);

impl ApiPath {
    /// A path starting with one segment
    pub fn root(segment: impl ToString) -> Self {
        Self(vec![segment.to_string()])
    }

    /// `repos/{owner}/{repo}`
    pub fn repo(owner: &str, repo: &str) -> Self {
        Self::root("repos").push(owner).push(repo)
    }

    /// Append one segment
    pub fn push(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// The raw segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// One call to the Forgejo API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the API root
    pub path: ApiPath,
    /// Query parameters in insertion order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
}

impl ApiRequest {
    /// A request with no query and no body
    pub fn new(method: Method, path: ApiPath) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET path`
    pub fn get(path: ApiPath) -> Self {
        Self::new(Method::Get, path)
    }

    /// `POST path` with a JSON body
    pub fn post(path: ApiPath, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    /// `PATCH path` with a JSON body
    pub fn patch(path: ApiPath, body: Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    /// `DELETE path`
    pub fn delete(path: ApiPath) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a query parameter
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter when a value is present
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Value of the first query parameter named `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `METHOD path`, the key [`super::MockTransport`] matches on
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Sends API requests and returns the decoded JSON body
///
/// Implementations map non-success statuses to
/// [`crate::error::ForgeMcpError::Api`] and empty bodies to [`Value::Null`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repo_path_display() {
        let path = ApiPath::repo("org", "project").push("issues").push(42);
        assert_eq!(path.to_string(), "repos/org/project/issues/42");
        assert_eq!(path.segments().len(), 5);
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::get(ApiPath::root("user").push("repos"))
            .query("page", 2)
            .query_opt("limit", None::<u32>)
            .query_opt("q", Some("mcp"));
        assert_eq!(request.route(), "GET user/repos");
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(request.query_value("limit"), None);
        assert_eq!(request.query_value("q"), Some("mcp"));
        assert!(request.body.is_none());

        let request = ApiRequest::patch(ApiPath::root("x"), json!({"a": 1}));
        assert_eq!(request.method, Method::Patch);
        assert_eq!(request.body, Some(json!({"a": 1})));
    }
}
