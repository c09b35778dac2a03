use anyhow::Context as _;

use super::{cache::SchemaCache, metrics::GenerationWarning};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Profiles downloaded by one fetch pass.
#[derive(Debug, Default)]
pub struct FetchReport {
  pub fetched: Vec<String>,
  pub warnings: Vec<GenerationWarning>,
}

/// Downloads raw profile documents from the schema service.
pub struct SchemaFetcher {
  http: reqwest::Client,
  base_url: String,
}

impl SchemaFetcher {
  pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(USER_AGENT)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      http,
      base_url: base_url.into(),
    })
  }

  pub fn profile_url(&self, profile: &str) -> String {
    format!("{}{profile}", self.base_url)
  }

  /// Fetches each profile in order and stores successful bodies in `original/`.
  ///
  /// Non-success statuses and transport failures skip the profile.
  pub async fn fetch_all(&self, profiles: &[String], cache: &SchemaCache<'_>) -> anyhow::Result<FetchReport> {
    let mut report = FetchReport::default();

    for profile in profiles {
      match self.fetch(profile).await {
        Ok(body) => {
          cache.store_original(profile, &body).await?;
          report.fetched.push(profile.clone());
        }
        Err(err) => report.warnings.push(GenerationWarning::ProfileSkipped {
          profile: profile.clone(),
          reason: format!("{err:#}"),
        }),
      }
    }

    Ok(report)
  }

  async fn fetch(&self, profile: &str) -> anyhow::Result<String> {
    let url = self.profile_url(profile);
    let response = self
      .http
      .get(&url)
      .send()
      .await
      .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
      anyhow::bail!("HTTP {status}");
    }

    response
      .text()
      .await
      .with_context(|| format!("failed to read body of {url}"))
  }
}
