//! Runtime support for the generated Toshl client.
//!
//! Generated `endpoints.rs` files only describe *what* to call: the verb, the
//! href template and the record types. Everything that actually talks to the
//! API lives here so the generated code stays small and declarative.

mod client;
mod error;

pub use chrono;
pub use client::{ApiResponse, Client, DEFAULT_BASE_URL, RequestBuilder};
pub use error::ApiError;
pub use http::Method;
pub use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
pub use serde_with::skip_serializing_none;

pub const PATH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[inline]
#[must_use]
pub fn percent_encode_path_segment(segment: &str) -> String {
  utf8_percent_encode(segment, PATH_ENCODE_SET).to_string()
}

/// A decoded response body that may hold a single record or a list of them.
///
/// Toshl answers `GET /entries` with an array and `GET /entries/{id}` with an
/// object, while both resolve to the same record type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
  Many(Vec<T>),
  One(T),
}

impl<T> Payload<T> {
  #[must_use]
  pub fn into_vec(self) -> Vec<T> {
    match self {
      Self::Many(items) => items,
      Self::One(item) => vec![item],
    }
  }

  #[must_use]
  pub fn into_one(self) -> Option<T> {
    match self {
      Self::One(item) => Some(item),
      Self::Many(items) => items.into_iter().next(),
    }
  }

  #[must_use]
  pub fn len(&self) -> usize {
    match self {
      Self::Many(items) => items.len(),
      Self::One(_) => 1,
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Static description of one generated endpoint, used by the flat lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointInfo {
  /// Dotted endpoint name, e.g. `accounts.get`.
  pub name: &'static str,
  /// Argument record type name, if the endpoint takes one.
  pub argument: Option<&'static str>,
  pub href: &'static str,
  pub method: &'static str,
  /// Return record type name, if a return shape was resolved.
  pub returns: Option<&'static str>,
}

impl EndpointInfo {
  /// Finds an endpoint in a table sorted by name.
  #[must_use]
  pub fn find<'a>(table: &'a [EndpointInfo], name: &str) -> Option<&'a EndpointInfo> {
    table
      .binary_search_by(|info| info.name.cmp(name))
      .ok()
      .map(|index| &table[index])
  }

  /// Names of the `{placeholder}` segments in the href template.
  pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
    client::placeholders(self.href)
  }
}
