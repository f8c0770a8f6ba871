use super::OutputFormat;
use crate::bio::NameNormalizer;
use clap::Args;
use colored::*;
use indexmap::IndexMap;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Names or queries to normalize
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: NormalizeArgs) -> anyhow::Result<()> {
    let normalizer = NameNormalizer::new();
    let normalized: IndexMap<&str, String> = args
        .names
        .iter()
        .map(|name| (name.as_str(), normalizer.normalize(name)))
        .collect();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&normalized)?),
        OutputFormat::Text => {
            for (raw, name) in &normalized {
                if name.is_empty() {
                    println!("{} {} {}", raw, "→".dimmed(), "(empty)".dimmed());
                } else {
                    println!("{} {} {}", raw, "→".dimmed(), name.green());
                }
            }
        }
    }

    Ok(())
}
