use super::ChecklistArgs;
use crate::cli::output::*;
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub checklist: ChecklistArgs,

    /// List every dangling synonym link
    #[arg(long)]
    pub detailed: bool,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let registry = args.checklist.load()?;

    let synonyms = registry.iter().filter(|taxon| taxon.is_synonym()).count();
    let vernaculars = registry
        .iter()
        .filter(|taxon| !taxon.vernacular_name.is_empty())
        .count();
    let unused = registry.iter().filter(|taxon| !taxon.used).count();
    let dangling = registry.dangling_links();

    section_header_with_line("Checklist Report");
    tree_item(false, "Taxa", Some(&format_number(registry.len())));
    tree_item(false, "Synonyms", Some(&format_number(synonyms)));
    tree_item(false, "Vernacular names", Some(&format_number(vernaculars)));
    tree_item(false, "Without records", Some(&format_number(unused)));
    tree_item(true, "Dangling synonym links", Some(&format_number(dangling.len())));

    if args.detailed && !dangling.is_empty() {
        section_header("Dangling Links");
        let mut table = create_standard_table();
        table.set_header(vec![header_cell("Synonym"), header_cell("Missing accepted id")]);
        for (entity_id, accepted_id) in &dangling {
            table.add_row(vec![entity_id.to_string(), accepted_id.red().to_string()]);
        }
        println!("{}", table);
    }

    registry.validate_links()?;
    success("All synonym links resolve");

    Ok(())
}
