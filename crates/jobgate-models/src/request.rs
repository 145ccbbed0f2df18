//! Scrape request model and payload adapter.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Parameter names the engine accepts, in forwarding order.
pub const ALLOWED_PARAMS: [&str; 20] = [
    "site_name",
    "search_term",
    "google_search_term",
    "location",
    "results_wanted",
    "hours_old",
    "country_indeed",
    "distance",
    "job_type",
    "proxies",
    "is_remote",
    "easy_apply",
    "user_agent",
    "description_format",
    "offset",
    "verbose",
    "linkedin_fetch_description",
    "linkedin_company_ids",
    "enforce_annual_salary",
    "ca_cert",
];

/// Reasons a request body cannot be turned into a scrape call.
#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("request body is empty")]
    Missing,

    #[error("request body is not valid JSON: {0}")]
    Unparsable(String),

    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// Filtered scrape call.
///
/// Each field holds the client value verbatim. `None` means the key was
/// absent from the payload and is not forwarded; an explicit JSON `null`
/// is kept as `Some(Value::Null)`. Keys outside the allow-list are dropped
/// during deserialization without error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub site_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub search_term: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub google_search_term: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub results_wanted: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub hours_old: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub country_indeed: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub distance: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub proxies: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub is_remote: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub easy_apply: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description_format: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub offset: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub verbose: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub linkedin_fetch_description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub linkedin_company_ids: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub enforce_annual_salary: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<Value>,
}

/// Keeps an explicit `null` distinguishable from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ScrapeRequest {
    /// All allow-listed fields paired with their name, in `ALLOWED_PARAMS` order.
    pub fn fields(&self) -> [(&'static str, Option<&Value>); 20] {
        [
            ("site_name", self.site_name.as_ref()),
            ("search_term", self.search_term.as_ref()),
            ("google_search_term", self.google_search_term.as_ref()),
            ("location", self.location.as_ref()),
            ("results_wanted", self.results_wanted.as_ref()),
            ("hours_old", self.hours_old.as_ref()),
            ("country_indeed", self.country_indeed.as_ref()),
            ("distance", self.distance.as_ref()),
            ("job_type", self.job_type.as_ref()),
            ("proxies", self.proxies.as_ref()),
            ("is_remote", self.is_remote.as_ref()),
            ("easy_apply", self.easy_apply.as_ref()),
            ("user_agent", self.user_agent.as_ref()),
            ("description_format", self.description_format.as_ref()),
            ("offset", self.offset.as_ref()),
            ("verbose", self.verbose.as_ref()),
            ("linkedin_fetch_description", self.linkedin_fetch_description.as_ref()),
            ("linkedin_company_ids", self.linkedin_company_ids.as_ref()),
            ("enforce_annual_salary", self.enforce_annual_salary.as_ref()),
            ("ca_cert", self.ca_cert.as_ref()),
        ]
    }

    /// Names of the parameters that will reach the engine.
    pub fn forwarded_keys(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter_map(|(name, value)| value.map(|_| name))
            .collect()
    }

    /// Number of parameters that will reach the engine.
    pub fn len(&self) -> usize {
        self.fields().iter().filter(|(_, v)| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The filtered call as a JSON object holding only the forwarded keys.
    pub fn to_params(&self) -> serde_json::Map<String, Value> {
        self.fields()
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.clone())))
            .collect()
    }
}

/// Turn a raw request body into a filtered scrape call.
///
/// An empty object is a valid call with no parameters. A missing body,
/// invalid JSON, or any JSON value other than an object is rejected.
pub fn adapt(body: &[u8]) -> Result<ScrapeRequest, PayloadError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(PayloadError::Missing);
    }

    let payload: Value =
        serde_json::from_slice(body).map_err(|e| PayloadError::Unparsable(e.to_string()))?;

    if !payload.is_object() {
        return Err(PayloadError::NotAnObject);
    }

    serde_json::from_value(payload).map_err(|e| PayloadError::Unparsable(e.to_string()))
}
