#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::{
  generator::config::{GeneratorConfig, Quirks},
  ui::{Cli, Colors},
};

mod generator;
mod naming;
mod ui;
mod utils;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::detect();

  let config = GeneratorConfig::builder()
    .offline(cli.offline)
    .quirks(Quirks::embedded()?)
    .build();

  ui::commands::generate_client(config, &colors).await?;
  Ok(())
}
