//! # Catalog Subcommand
//!
//! Prints the standard match types as a table or as JSON.

use anyhow::Result;
use clap::Args;

use ringside_state::matches::CATALOG;
use ringside_state::MatchType;

/// Arguments for `ringside catalog`.
#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub fn run_catalog(args: &CatalogArgs) -> Result<u8> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(CATALOG)?);
    } else {
        print!("{}", render_table(CATALOG));
    }
    Ok(0)
}

fn count(n: Option<usize>) -> String {
    n.map_or_else(|| "any".to_string(), |n| n.to_string())
}

/// Fixed-width table of match types.
pub fn render_table(types: &[MatchType]) -> String {
    let mut out = format!("{:<24} {:<12} {:>5} {:>11}\n", "NAME", "SLUG", "SIDES", "COMPETITORS");
    for t in types {
        out.push_str(&format!(
            "{:<24} {:<12} {:>5} {:>11}\n",
            t.name,
            t.slug,
            count(t.template.number_of_sides),
            count(t.template.number_of_competitors),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_header_and_every_type() {
        let table = render_table(CATALOG);
        assert_eq!(table.lines().count(), CATALOG.len() + 1);
        assert!(table.starts_with("NAME"));
    }

    #[test]
    fn open_counts_render_as_any() {
        let table = render_table(CATALOG);
        let gauntlet = table.lines().find(|l| l.contains("gauntlet")).unwrap();
        assert!(gauntlet.contains("any"));
    }
}
