//! screenforge CLI - Flutter code from UI images and descriptions

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod format;
mod logging;

use commands::{cmd_config_init, cmd_config_reset, cmd_config_show, cmd_elements, cmd_generate, cmd_navigation};
use logging::init_logging;
use screenforge::Config;

#[derive(Parser)]
#[command(name = "screenforge")]
#[command(about = "Generate Flutter code from UI images and descriptions")]
#[command(after_help = "\
QUICK START:
  screenforge config init                          # Create .screenforge.toml
  screenforge generate --image login.png           # Flutter code from a screenshot
  screenforge generate --prompt \"a todo list\"      # Flutter code from a description

PROJECTS:
  screenforge elements --image home.png --view v1 --store store.json
  screenforge navigation --project p1 --store store.json")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate Flutter code from an image or a text description
  Generate {
    /// UI image (PNG/JPEG bytes, or a text file holding base64 / a data URI)
    #[arg(long, conflicts_with = "prompt", required_unless_present = "prompt")]
    image: Option<PathBuf>,
    /// Text description of the app
    #[arg(long)]
    prompt: Option<String>,
    /// App name used in prompts and the bootstrap title
    #[arg(long)]
    app_name: Option<String>,
    /// Extra instructions for the model
    #[arg(long)]
    instructions: Option<String>,
    /// Output directory (default: configured output.directory)
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Also generate navigation for this project (requires --store)
    #[arg(long, requires = "store")]
    project: Option<String>,
    /// JSON document holding views and elements
    #[arg(long)]
    store: Option<PathBuf>,
    /// Print the bundle as JSON instead of writing files
    #[arg(long)]
    json: bool,
  },
  /// Extract UI elements from an image into a view
  Elements {
    /// UI image
    #[arg(long)]
    image: PathBuf,
    /// View that receives the elements
    #[arg(long)]
    view: String,
    /// JSON document holding views and elements
    #[arg(long)]
    store: PathBuf,
    /// Extra instructions for the model
    #[arg(long)]
    instructions: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Generate routes and navigation files for a multi-view project
  Navigation {
    /// Project whose views become routes
    #[arg(long)]
    project: String,
    /// JSON document holding views and elements
    #[arg(long)]
    store: PathBuf,
    /// Output directory (default: configured output.directory)
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// App name used as the bootstrap title
    #[arg(long)]
    app_name: Option<String>,
    /// Print the navigation bundle as JSON instead of writing files
    #[arg(long)]
    json: bool,
  },
  /// Manage configuration
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

/// Subcommands for `screenforge config`
#[derive(Subcommand)]
enum ConfigCommand {
  /// Show the effective configuration
  Show,
  /// Write a commented configuration template
  Init {
    /// Write the user config instead of .screenforge.toml
    #[arg(long)]
    user: bool,
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
  },
  /// Reset the user configuration to defaults
  Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let cwd = std::env::current_dir()?;
  let config = Config::load_for_dir(&cwd);
  let _guard = init_logging(&config.logging);

  match cli.command {
    Commands::Generate {
      image,
      prompt,
      app_name,
      instructions,
      out,
      project,
      store,
      json,
    } => {
      let args = commands::GenerateArgs {
        image,
        prompt,
        app_name,
        instructions,
        out,
        project,
        store,
        json,
      };
      cmd_generate(config, args).await
    }
    Commands::Elements {
      image,
      view,
      store,
      instructions,
      json,
    } => cmd_elements(config, &image, &view, &store, instructions, json).await,
    Commands::Navigation {
      project,
      store,
      out,
      app_name,
      json,
    } => cmd_navigation(config, &project, &store, out, app_name, json).await,
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(&cwd, &config),
      ConfigCommand::Init { user, force } => cmd_config_init(&cwd, user, force),
      ConfigCommand::Reset => cmd_config_reset(),
    },
  }
}
