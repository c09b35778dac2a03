use http::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{ApiError, percent_encode_path_segment};

pub const DEFAULT_BASE_URL: &str = "https://api2.toshl.com";

/// Blocking HTTP client authenticated with a Toshl personal access token.
#[derive(Debug, Clone)]
pub struct Client {
  http: reqwest::blocking::Client,
  api_key: String,
  base_url: String,
}

impl Client {
  #[must_use]
  pub fn new(api_key: impl Into<String>) -> Self {
    Self::with_base_url(api_key, DEFAULT_BASE_URL)
  }

  #[must_use]
  pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
    Self {
      http: reqwest::blocking::Client::new(),
      api_key: api_key.into(),
      base_url: base_url.into().trim_end_matches('/').to_string(),
    }
  }

  #[must_use]
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn request(&self, method: Method, href: &'static str) -> RequestBuilder<'_> {
    RequestBuilder {
      client: self,
      method,
      href,
      path: Vec::new(),
      fields: None,
    }
  }
}

/// One pending call against an href template.
#[derive(Debug)]
pub struct RequestBuilder<'a> {
  client: &'a Client,
  method: Method,
  href: &'static str,
  path: Vec<(String, String)>,
  fields: Option<Map<String, Value>>,
}

impl RequestBuilder<'_> {
  /// Supplies a value for a `{placeholder}` that is not part of the argument record.
  #[must_use]
  pub fn path(mut self, name: &str, value: impl ToString) -> Self {
    self.path.push((name.to_string(), value.to_string()));
    self
  }

  /// Serializes the argument record into its wire fields.
  pub fn argument<A: Serialize>(mut self, argument: &A) -> Result<Self, ApiError> {
    let fields = match serde_json::to_value(argument).map_err(ApiError::Encode)? {
      Value::Object(map) => map,
      Value::Null => Map::new(),
      other => {
        return Err(ApiError::ArgumentNotObject {
          kind: value_kind(&other),
        });
      }
    };
    self.fields = Some(fields);
    Ok(self)
  }

  /// Resolves the href template against the supplied path values and argument fields.
  ///
  /// Argument fields consumed by a placeholder are removed so they are not sent twice.
  pub fn render_href(&mut self) -> Result<String, ApiError> {
    render_href(self.href, &self.path, self.fields.as_mut())
  }

  pub fn send(mut self) -> Result<ApiResponse, ApiError> {
    let href = self.render_href()?;
    let url = format!("{}{href}", self.client.base_url);

    let mut req_builder = self
      .client
      .http
      .request(self.method.clone(), url)
      .basic_auth(&self.client.api_key, Some(""));

    if let Some(fields) = self.fields {
      if self.method == Method::GET {
        req_builder = req_builder.query(&query_pairs(&fields));
      } else {
        req_builder = req_builder.json(&Value::Object(fields));
      }
    }

    let response = req_builder.send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
      return Err(ApiError::Status { status, body });
    }

    Ok(ApiResponse { status, body })
  }
}

/// A successful response body, not yet decoded.
#[derive(Debug, Clone)]
pub struct ApiResponse {
  pub status: http::StatusCode,
  pub body: String,
}

impl ApiResponse {
  pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
    let deserializer = &mut serde_json::Deserializer::from_str(&self.body);
    Ok(serde_path_to_error::deserialize(deserializer)?)
  }

  pub fn into_value(self) -> Result<Value, ApiError> {
    if self.body.trim().is_empty() {
      return Ok(Value::Null);
    }
    self.decode()
  }
}

pub(crate) fn placeholders(href: &str) -> impl Iterator<Item = &str> {
  href.split('/').filter_map(|segment| {
    segment
      .strip_prefix('{')
      .and_then(|rest| rest.split_once('}'))
      .map(|(name, _)| name)
  })
}

fn render_href(
  href: &str,
  path: &[(String, String)],
  mut fields: Option<&mut Map<String, Value>>,
) -> Result<String, ApiError> {
  let mut rendered = String::with_capacity(href.len());
  let mut rest = href;

  while let Some(start) = rest.find('{') {
    let Some(len) = rest[start..].find('}') else {
      break;
    };
    let name = &rest[start + 1..start + len];
    rendered.push_str(&rest[..start]);

    let explicit = path.iter().find(|(key, _)| key == name).map(|(_, value)| value.clone());
    let value = match explicit {
      Some(value) => Some(value),
      None => fields
        .as_deref_mut()
        .and_then(|map| map.remove(name))
        .and_then(|value| scalar_to_string(&value)),
    };

    let Some(value) = value else {
      return Err(ApiError::MissingPathParameter {
        href: href.to_string(),
        name: name.to_string(),
      });
    };

    rendered.push_str(&percent_encode_path_segment(&value));
    rest = &rest[start + len + 1..];
  }

  rendered.push_str(rest);
  Ok(rendered)
}

fn query_pairs(fields: &Map<String, Value>) -> Vec<(String, String)> {
  let mut pairs = Vec::with_capacity(fields.len());
  for (key, value) in fields {
    match value {
      Value::Null => {}
      Value::Array(items) => {
        pairs.extend(
          items
            .iter()
            .filter_map(scalar_or_json)
            .map(|item| (key.clone(), item)),
        );
      }
      other => {
        if let Some(text) = scalar_or_json(other) {
          pairs.push((key.clone(), text));
        }
      }
    }
  }
  pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Null | Value::Array(_) | Value::Object(_) => None,
  }
}

fn scalar_or_json(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    scalar => scalar_to_string(scalar),
  }
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}
