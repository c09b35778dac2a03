use clap::Parser;

use super::Colors;

#[derive(Parser, Debug)]
#[command(name = "toshl-gen")]
#[command(author, version, about = "Typed Rust client generator for the Toshl API")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  /// Regenerate from the cached repaired schemas without downloading
  #[arg(long, default_value_t = false)]
  pub offline: bool,
}
