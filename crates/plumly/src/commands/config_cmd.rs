//! Config subcommand handlers.

use plumly_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::Printer;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let printer = Printer::new(global);
    match args.command {
        ConfigCommand::Path => {
            printer.emit(&plumly_config::config_path().display().to_string());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = plumly_config::load_config()?.redacted();
            let out = match printer.format() {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
                OutputFormat::Json | OutputFormat::JsonCompact => printer.json(&cfg),
            };
            printer.emit(&out);
            Ok(())
        }

        ConfigCommand::Init { username, force } => {
            let path = plumly_config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let cfg = Config {
                username,
                ..Config::default()
            };
            let written = plumly_config::save_config(&cfg)?;
            printer.emit(&format!("Wrote {}", written.display()));
            Ok(())
        }
    }
}
