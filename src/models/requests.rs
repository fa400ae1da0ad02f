//! Request descriptors
//!
//! Describes one API call: verb, action path, parameters and optional TTL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};
use crate::models::params::{build_params, Params};

/// Separator between the parts of a cache key and between its parameters
pub const KEY_GLUE: &str = "_";

// == HTTP Verb ==
/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpVerb {
    Get,
    Head,
    Delete,
    Options,
    Post,
    Put,
    Patch,
}

impl HttpVerb {
    /// Lowercase verb name, as used in cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Head => "head",
            HttpVerb::Delete => "delete",
            HttpVerb::Options => "options",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Patch => "patch",
        }
    }

    /// GET-style verbs carry their parameters in the query string; the others
    /// send them as a JSON body.
    pub fn uses_query_string(self) -> bool {
        matches!(
            self,
            HttpVerb::Get | HttpVerb::Head | HttpVerb::Delete | HttpVerb::Options
        )
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(HttpVerb::Get),
            "head" => Ok(HttpVerb::Head),
            "delete" => Ok(HttpVerb::Delete),
            "options" => Ok(HttpVerb::Options),
            "post" => Ok(HttpVerb::Post),
            "put" => Ok(HttpVerb::Put),
            "patch" => Ok(HttpVerb::Patch),
            "" => Err(CacheError::Configuration(
                "Request descriptor is missing its HTTP method".to_string(),
            )),
            other => Err(CacheError::Configuration(format!(
                "Unknown HTTP method: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for HttpVerb {
    type Error = CacheError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HttpVerb> for String {
    fn from(verb: HttpVerb) -> Self {
        verb.as_str().to_string()
    }
}

// == Request Descriptor ==
/// Everything needed to issue, and possibly cache, one API call.
///
/// A descriptor without `ttl_seconds` bypasses the cache entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method
    pub method: HttpVerb,
    /// Action path appended to the resource URL
    pub action: String,
    /// Ordered request parameters
    #[serde(default)]
    pub params: Params,
    /// Cache lifetime in seconds; None disables caching
    #[serde(default)]
    pub ttl_seconds: Option<u64>,
}

impl RequestDescriptor {
    /// Creates an uncached descriptor without parameters.
    pub fn new(method: HttpVerb, action: impl Into<String>) -> Self {
        Self {
            method,
            action: action.into(),
            params: Params::new(),
            ttl_seconds: None,
        }
    }

    /// Appends one parameter, keeping insertion order.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replaces all parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Enables caching with the given TTL.
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    /// Rejects descriptors that cannot address an endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.action.trim().is_empty() {
            return Err(CacheError::Configuration(
                "Request descriptor is missing its action path".to_string(),
            ));
        }
        Ok(())
    }

    /// Parameters serialized with `glue`.
    pub fn build_params(&self, glue: &str) -> String {
        build_params(&self.params, glue)
    }

    /// Deterministic cache key: `method_action_params`.
    pub fn build_cache_key(&self) -> String {
        format!(
            "{}{glue}{}{glue}{}",
            self.method,
            self.action,
            self.build_params(KEY_GLUE),
            glue = KEY_GLUE
        )
    }
}
