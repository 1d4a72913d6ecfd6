use crate::prelude::{eprintln, println, *};
use crate::service::StatesService;
use crate::store::FunFactStore;
use states_core::projections::format_thousands;
use states_core::{Contiguity, MergedStateView};

#[derive(Debug, clap::Args)]
pub struct ListOptions {
    /// Only contiguous states (true) or only Alaska and Hawaii (false)
    #[arg(long)]
    pub contig: Option<bool>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListOptions {
    fn contiguity(&self) -> Option<Contiguity> {
        self.contig.map(|contig| {
            if contig {
                Contiguity::Contiguous
            } else {
                Contiguity::NonContiguous
            }
        })
    }
}

pub async fn run(options: ListOptions, global: crate::Global) -> Result<()> {
    let database = global.database_path();
    if global.verbose {
        eprintln!("Database: {}", database.display());
    }

    let store = FunFactStore::open(&database)?;
    let states = StatesService::new(store)
        .merged_list(options.contiguity())
        .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&states)?);
    } else {
        build_table(&states).printstd();
    }

    Ok(())
}

fn build_table(states: &[MergedStateView]) -> prettytable::Table {
    let mut table = new_table();
    table.set_titles(prettytable::row![
        "Code",
        "State",
        "Capital",
        "Nickname",
        "Population",
        "Admitted",
        "Fun facts"
    ]);

    for view in states {
        let record = &view.record;
        table.add_row(prettytable::row![
            record.code,
            record.name,
            record.capital_city,
            record.nickname,
            r->format_thousands(record.population),
            record.admission_date,
            r->view.funfacts.as_ref().map_or(0, Vec::len)
        ]);
    }

    table
}
