use thiserror::Error;

/// Errors raised by the generated client.
///
/// Every request is attempted exactly once; callers decide whether a failure
/// is worth retrying.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The API answered with a non-success status code.
  #[error("request failed with status {status}: {body}")]
  Status { status: http::StatusCode, body: String },

  /// The request never produced a response.
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The href template names a placeholder that no argument supplied.
  #[error("missing value for placeholder '{{{name}}}' in '{href}'")]
  MissingPathParameter { href: String, name: String },

  /// The argument record could not be turned into wire fields.
  #[error("failed to encode argument: {0}")]
  Encode(#[source] serde_json::Error),

  /// The argument record did not serialize into a JSON object.
  #[error("argument must serialize to a JSON object, got {kind}")]
  ArgumentNotObject { kind: &'static str },

  /// The response body did not match the expected record shape.
  #[error("failed to decode response at '{path}': {source}")]
  Decode {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

impl ApiError {
  #[must_use]
  pub fn status(&self) -> Option<http::StatusCode> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Transport(err) => err.status(),
      _ => None,
    }
  }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ApiError {
  fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
    let path = err.path().to_string();
    Self::Decode {
      path,
      source: err.into_inner(),
    }
  }
}
