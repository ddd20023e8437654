use crate::{util, RequestData};
use serde_json::Value;
use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
};

/// Pseudo-resource for administrative and aggregate commands.
pub const COMMAND_RESOURCE: &str = "$cmd";
/// Pseudo-resource for SQL passthrough.
pub const SQL_RESOURCE: &str = "system.sql";
/// Pseudo-resource for joins across collections and tables.
pub const JOIN_RESOURCE: &str = "system.join";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How query values are written into the wire URL.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum QueryEncoding {
    /// Values are embedded verbatim, JSON punctuation and spaces included.
    Raw,
    /// Every byte outside the unreserved set is percent-encoded.
    Percent,
}

impl Default for QueryEncoding {
    fn default() -> Self {
        QueryEncoding::Percent
    }
}

impl FromStr for QueryEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(QueryEncoding::Raw),
            "percent" => Ok(QueryEncoding::Percent),
            other => Err(format!("unknown query encoding '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

impl QueryParam {
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A parameter whose value is the compact JSON form of `value`.
    pub fn json<K: Into<String>>(key: K, value: &Value) -> Self {
        Self::new(key, value.to_string())
    }
}

/// Everything needed to issue one request, independent of the base URL it is sent to.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub resource: String,
    pub params: Vec<QueryParam>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// `resource` may be empty, in which case the request targets the base URL itself.
    pub fn new<S: Into<String>>(method: Method, resource: S) -> Self {
        Self {
            method,
            resource: resource.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_param(mut self, param: QueryParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_json_param<K: Into<String>>(self, key: K, value: Value) -> Self {
        self.with_param(QueryParam::json(key, &value))
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path and query string relative to the base URL.
    pub fn path_and_query(&self, encoding: QueryEncoding) -> String {
        let mut path = String::new();

        if !self.resource.is_empty() {
            path.push('/');
            path.push_str(&self.resource);
        }

        for (index, param) in self.params.iter().enumerate() {
            path.push(if index == 0 { '?' } else { '&' });
            path.push_str(&param.key);
            path.push('=');
            match encoding {
                QueryEncoding::Raw => path.push_str(&param.value),
                QueryEncoding::Percent => path.push_str(&util::percent_encode(&param.value)),
            }
        }

        path
    }

    /// The URL exactly as written by hand, with query values unencoded.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.path_and_query(QueryEncoding::Raw))
    }

    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(|body| body.to_string())
            .unwrap_or_default()
    }

    pub fn to_request_data(&self, base_url: &str, encoding: QueryEncoding) -> RequestData {
        let mut headers = HashMap::new();

        if self.body.is_some() {
            headers.insert(
                String::from("content-type"),
                String::from("application/json"),
            );
        }

        RequestData {
            uri: format!("{}{}", base_url, self.path_and_query(encoding)),
            method: String::from(self.method.as_str()),
            headers,
            body: self.body_string(),
        }
    }
}
