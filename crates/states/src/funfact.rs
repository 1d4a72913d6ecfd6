use serde::Serialize;

use crate::prelude::{eprintln, println, *};
use crate::service::StatesService;
use crate::store::FunFactStore;

#[derive(Debug, clap::Parser)]
#[command(name = "funfact")]
#[command(about = "Read and edit a state's fun facts")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Print one fun fact chosen at random
    #[clap(name = "random")]
    Random {
        /// Two-letter state code
        state: String,
    },

    /// Append one or more fun facts
    #[clap(name = "add")]
    Add {
        /// Two-letter state code
        state: String,
        /// Fun facts to append, in order
        #[arg(required = true)]
        facts: Vec<String>,
    },

    /// Replace the fun fact at a 1-based index
    #[clap(name = "update")]
    Update {
        /// Two-letter state code
        state: String,
        /// 1-based position of the fact to replace
        index: usize,
        /// New text
        fact: String,
    },

    /// Delete the fun fact at a 1-based index
    #[clap(name = "delete")]
    Delete {
        /// Two-letter state code
        state: String,
        /// 1-based position of the fact to delete
        index: usize,
    },
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let database = global.database_path();
    if global.verbose {
        eprintln!("Database: {}", database.display());
    }

    let service = StatesService::new(FunFactStore::open(&database)?);

    match app.command {
        Commands::Random { state } => print_json(&service.random_fun_fact(&state).await?),
        Commands::Add { state, facts } => {
            print_json(&service.create_fun_facts(&state, facts).await?)
        }
        Commands::Update { state, index, fact } => {
            print_json(&service.replace_fun_fact(&state, index, fact).await?)
        }
        Commands::Delete { state, index } => {
            print_json(&service.delete_fun_fact(&state, index).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
    println!("{}", json);
    Ok(())
}
