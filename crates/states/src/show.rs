use colored::Colorize;

use crate::prelude::{println, *};
use crate::service::StatesService;
use crate::store::FunFactStore;
use states_core::projections::format_thousands;
use states_core::MergedStateView;

#[derive(Debug, clap::Args)]
pub struct ShowOptions {
    /// Two-letter state code (case-insensitive)
    #[arg(value_name = "STATE")]
    pub state: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: ShowOptions, global: crate::Global) -> Result<()> {
    let store = FunFactStore::open(&global.database_path())?;
    let view = StatesService::new(store)
        .merged_single(&options.state)
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", format_state_text(&view));
    }

    Ok(())
}

fn format_state_text(view: &MergedStateView) -> String {
    let record = &view.record;
    let mut result = String::new();

    result.push_str(&format!(
        "\n{} {}\n",
        record.name.bright_cyan().bold(),
        format!("({})", record.code).bright_black()
    ));
    result.push_str(&format!("{}\n", "=".repeat(60).bright_cyan()));
    result.push_str(&format!("{}: {}\n", "Capital".green(), record.capital_city));
    result.push_str(&format!("{}: {}\n", "Nickname".green(), record.nickname));
    result.push_str(&format!(
        "{}: {} (rank {})\n",
        "Population".green(),
        format_thousands(record.population),
        record.population_rank
    ));
    result.push_str(&format!(
        "{}: {} (#{})\n",
        "Admitted".green(),
        record.admission_date,
        record.admission_number
    ));

    match &view.funfacts {
        Some(facts) => {
            result.push_str(&format!("\n{}\n", "Fun facts".yellow().bold()));
            for (idx, fact) in facts.iter().enumerate() {
                result.push_str(&format!("  {} {}\n", format!("[{}]", idx + 1).yellow(), fact));
            }
        }
        None => result.push_str(&format!("\n{}\n", "No fun facts yet.".yellow())),
    }

    result
}
