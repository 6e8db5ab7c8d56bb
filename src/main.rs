mod cli;
mod cli_help;
mod commands;

use std::path::PathBuf;
use std::str::FromStr;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{ImportArgs, ImportTarget};
use materiality::config::{Config, Overrides};
use materiality::error::Result;
use materiality::model::{RatingType, SubmissionType};

fn init_logging(verbose: bool) {
    let default = if verbose { "materiality=info,dm=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Where settings come from. Local subcommands only need the lens, so a
/// broken config file does not stop them when `--rating-type` is given.
struct Settings {
    config_path: Option<PathBuf>,
    overrides: Overrides,
}

impl Settings {
    fn remote(&self) -> Result<Config> {
        Ok(Config::load(self.config_path.as_deref())?.resolve(self.overrides.clone()))
    }

    fn local_rating_type(&self) -> Result<RatingType> {
        Config::local_rating_type(self.overrides.rating_type, self.config_path.as_deref())
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        rating_type,
        config,
        endpoint,
        report_id,
        ..
    } = cli;
    let settings = Settings {
        config_path: config,
        overrides: Overrides {
            endpoint,
            report_id,
            rating_type: rating_type
                .as_deref()
                .map(RatingType::from_str)
                .transpose()?,
        },
    };

    match command {
        Commands::Average { args } => {
            commands::average(&args.grouped, settings.local_rating_type()?, args.json)
        }
        Commands::Matrix { args, source } => commands::matrix(
            &args.grouped,
            settings.local_rating_type()?,
            &source,
            args.json,
        ),
        Commands::Materiality {
            impact,
            financial,
            json,
        } => commands::double_materiality(&impact, &financial, json),
        Commands::Template { entities, output } => {
            commands::template(settings.local_rating_type()?, &entities, output.as_deref())
        }
        Commands::Import {
            file,
            respondent_id,
            uploader,
            submission_type,
            into,
            submission_id,
            submit,
        } => {
            let kind = submission_type
                .as_deref()
                .map(SubmissionType::from_str)
                .transpose()?;
            let args = ImportArgs {
                file: &file,
                respondent_id: &respondent_id,
                uploader: &uploader,
                kind,
            };
            let remote: Config;
            let (rating_type, target) = match (&into, submit) {
                (Some(path), _) => (
                    settings.local_rating_type()?,
                    ImportTarget::Local {
                        path: path.as_path(),
                        submission_id: submission_id.as_deref(),
                    },
                ),
                (None, true) => {
                    remote = settings.remote()?;
                    (remote.rating_type, ImportTarget::Remote(&remote))
                }
                (None, false) => (settings.local_rating_type()?, ImportTarget::Print),
            };
            commands::import(rating_type, &args, target)
        }
        Commands::Fetch { json, output } => {
            commands::fetch(&settings.remote()?, json, output.as_deref())
        }
        Commands::Delete { id } => commands::delete(&settings.remote()?, &id),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dm", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
