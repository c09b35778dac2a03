use chrono::{Local, Timelike};
use crossterm::style::Stylize;

use crate::{
  generator::{
    codegen::GeneratedModule,
    config::GeneratorConfig,
    metrics::GenerationStats,
    orchestrator::{GenerationOutput, Orchestrator},
  },
  ui::Colors,
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

struct GenerateLogger<'a> {
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(colors: &'a Colors) -> Self {
    Self { colors }
  }

  fn info(&self, message: &str) {
    println!(
      "{} {}",
      format_timestamp().with(self.colors.timestamp()),
      message.with(self.colors.primary())
    );
  }

  fn stat(&self, label: &str, value: String) {
    println!(
      "            {:<25} {}",
      label.with(self.colors.label()),
      value.with(self.colors.value())
    );
  }

  fn log_config(&self, config: &GeneratorConfig) {
    let source = if config.offline {
      format!("cached schemas in {}", config.fixed_dir().display())
    } else {
      config.schema_base_url.clone()
    };
    self.info(&format!("Generating Toshl client from {source}"));
  }

  fn log_files(&self, module: &GeneratedModule) {
    for file in &module.files {
      self.info(&format!("Generated {} ({} lines)", file.name, file.source.lines().count()));
    }
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    println!();
    for (label, value) in stats.summary() {
      if value > 0 || label == "Endpoints" {
        self.stat(&format!("{label}:"), value.to_string());
      }
    }
    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    if stats.warnings.is_empty() {
      return;
    }

    println!();
    for warning in &stats.warnings {
      let tag = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        tag.with(self.colors.accent()),
        warning.to_string().with(self.colors.info())
      );
    }
  }

  fn log_success(&self, config: &GeneratorConfig) {
    println!();
    println!(
      "{} {}",
      format_timestamp().with(self.colors.timestamp()),
      format!("Successfully generated Toshl client in {}", config.output_dir.display()).with(self.colors.success())
    );
  }
}

/// Runs the pipeline stage by stage, logging progress between them.
pub async fn generate_client(config: GeneratorConfig, colors: &Colors) -> anyhow::Result<GenerationOutput> {
  let logger = GenerateLogger::new(colors);
  let orchestrator = Orchestrator::new(config);
  let config = orchestrator.config();
  let mut stats = GenerationStats::default();

  logger.log_config(config);

  if !config.offline {
    logger.info(&format!("Cleaning schema cache {}", config.schema_dir.display()));
    orchestrator.clean_cache().await?;

    logger.info(&format!("Downloading {} profiles", config.quirks.profiles.len()));
    orchestrator.download_profiles(&mut stats).await?;

    logger.info(&format!("Repairing schemas into {}", config.fixed_dir().display()));
    orchestrator.repair_schemas(&mut stats).await?;
  }

  logger.info("Materializing schemas");
  let documents = orchestrator.load_schemas().await?;
  let output = orchestrator.generate_from_documents(&documents, stats)?;
  logger.log_files(&output.module);

  logger.info(&format!("Writing to: {}", config.output_dir.display()));
  orchestrator.write_output(&output.module).await?;

  logger.print_statistics(&output.stats);
  logger.log_success(config);
  Ok(output)
}
