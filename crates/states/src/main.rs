use std::path::PathBuf;

use crate::prelude::*;
use clap::Parser;

mod error;
mod funfact;
mod list;
mod prelude;
mod server;
mod service;
mod show;
mod store;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "U.S. states reference data with user-submitted fun facts"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the fun facts SQLite database
    #[clap(long, env = "STATES_DATABASE", global = true)]
    database: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "STATES_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_database_path)
    }
}

fn default_database_path() -> PathBuf {
    dirs_next::data_dir()
        .map(|dir| dir.join("states").join("funfacts.db"))
        .unwrap_or_else(|| PathBuf::from("funfacts.db"))
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Run the HTTP API
    Serve(crate::server::ServeOptions),

    /// List states with their fun facts
    List(crate::list::ListOptions),

    /// Show one state with its fun facts
    Show(crate::show::ShowOptions),

    /// Read and edit a state's fun facts
    Funfact(crate::funfact::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("Failed to load .env file");
        }
    }

    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Serve(options) => crate::server::run(options, app.global).await,
        SubCommands::List(options) => crate::list::run(options, app.global).await,
        SubCommands::Show(options) => crate::show::run(options, app.global).await,
        SubCommands::Funfact(sub_app) => crate::funfact::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_database_path_wins() {
        let app = App::try_parse_from(["states", "--database", "/tmp/x.db", "list"]).unwrap();
        assert_eq!(app.global.database_path(), PathBuf::from("/tmp/x.db"));
    }

    #[test]
    fn test_default_database_file_name() {
        assert!(default_database_path().ends_with("funfacts.db"));
    }

    #[test]
    fn test_serve_parses_allowed_origins() {
        let app = App::try_parse_from([
            "states",
            "serve",
            "--port",
            "8080",
            "--allowed-origin",
            "https://a.example,https://b.example",
        ])
        .unwrap();
        match app.command {
            SubCommands::Serve(options) => {
                assert_eq!(options.port, 8080);
                assert_eq!(
                    options.allowed_origins,
                    vec!["https://a.example", "https://b.example"]
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
