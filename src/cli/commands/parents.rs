use super::{load_search_config, ChecklistArgs, OutputFormat};
use crate::cli::output::*;
use crate::core::TaxonSearch;
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct ParentsArgs {
    #[command(flatten)]
    pub checklist: ChecklistArgs,

    /// Taxon id whose relatives are listed
    pub taxon_id: String,

    /// List relatives that have vernacular names instead of accepted names
    #[arg(long)]
    pub vernacular: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: ParentsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_search_config(config_path)?;
    let registry = args.checklist.load()?;
    let search = TaxonSearch::new(&registry, config)?;

    let reference = registry.from_id(&args.taxon_id)?;
    let rows = search.lookup_parent_results(&args.taxon_id, args.vernacular)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            section_header_with_line(&format!("Taxa related to {}", reference.qualified_name()));
            if reference.parent_ids.is_empty() {
                info("Taxon has no recorded ancestors");
            }

            if rows.is_empty() {
                empty("No related taxa");
            } else {
                println!("{}", results_table(&rows));
            }
        }
    }

    Ok(())
}
