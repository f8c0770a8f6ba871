use super::{load_search_config, ChecklistArgs, OutputFormat};
use crate::cli::output::*;
use crate::core::{ResultRow, SearchConfig, TaxonSearch, TaxonSelection};
use clap::Args;
use colored::*;
use serde::Serialize;
use std::path::Path;

#[derive(Args)]
pub struct LookupArgs {
    #[command(flatten)]
    pub checklist: ChecklistArgs,

    /// Queries to look up (scientific, abbreviated or vernacular names)
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print the display markup of each row
    #[arg(long)]
    pub formatted: bool,

    /// Never flag rows as exact matches
    #[arg(long)]
    pub no_exact: bool,

    /// Show the value an exact match would select
    #[arg(long)]
    pub select: bool,

    /// Keep synonyms when selecting instead of switching to the accepted name
    #[arg(long)]
    pub keep_synonyms: bool,

    /// Maximum number of rows (overrides config)
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Disable vernacular name matching and display
    #[arg(long)]
    pub no_vernacular: bool,

    /// Only return taxa with occurrence records
    #[arg(long)]
    pub require_extant: bool,

    /// Drop taxa below this rank sort value
    #[arg(long, value_name = "RANK")]
    pub minimum_rank_sort: Option<i32>,
}

impl LookupArgs {
    /// Apply command line overrides on top of the loaded config
    pub fn apply_overrides(&self, mut config: SearchConfig) -> SearchConfig {
        if let Some(max_results) = self.max_results {
            config.max_results = max_results;
        }
        if self.no_vernacular {
            config.show_vernacular = false;
        }
        if self.require_extant {
            config.require_extant_records = true;
        }
        if self.minimum_rank_sort.is_some() {
            config.minimum_rank_sort = self.minimum_rank_sort;
        }
        config
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupReport<'a> {
    query: &'a str,
    results: &'a [ResultRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    selection: Option<TaxonSelection>,
}

pub fn run(args: LookupArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = args.apply_overrides(load_search_config(config_path)?);
    let registry = args.checklist.load()?;
    let search = TaxonSearch::new(&registry, config)?;

    let mut reports = Vec::with_capacity(args.queries.len());
    for query in &args.queries {
        let rows = search.lookup(query, Vec::new(), !args.no_exact)?;
        reports.push((query.as_str(), rows));
    }

    match args.format {
        OutputFormat::Json => {
            let json: Vec<LookupReport> = reports
                .iter()
                .map(|(query, rows)| LookupReport {
                    query,
                    results: rows,
                    selection: args
                        .select
                        .then(|| selection_for(rows, query, !args.keep_synonyms)),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            for (query, rows) in &reports {
                print_text_results(query, rows, &args);
            }
        }
    }

    Ok(())
}

fn selection_for(rows: &[ResultRow], query: &str, always_use_accepted: bool) -> TaxonSelection {
    TaxonSelection::resolve_input(rows, query, always_use_accepted, false)
}

fn print_text_results(query: &str, rows: &[ResultRow], args: &LookupArgs) {
    section_header_with_line(&format!("Results for \"{}\"", query));

    if rows.is_empty() {
        empty("No matching taxa");
        return;
    }

    println!("{}", results_table(rows));

    if args.formatted {
        println!();
        for row in rows {
            println!("  {}", row.formatted.dimmed());
        }
    }

    if args.select {
        let selection = selection_for(rows, query, !args.keep_synonyms);
        if selection.is_empty() {
            warning("No exact match to select");
        } else {
            success(&format!(
                "Selected {} ({})",
                selection.taxon_name.bold(),
                selection.taxon_id
            ));
        }
    }
}
