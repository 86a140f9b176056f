//! # Match Subcommand
//!
//! `ringside match check <file>` checks a match card offline: sides and
//! competitor counts against a catalog match type or explicit counts.
//! Competitors are listed by name; nobody's roster status is consulted.
//!
//! ```yaml
//! match_type: tagteam
//! sides:
//!   - tag_teams: [The Hart Foundation]
//!   - wrestlers: [Demolition Ax, Demolition Smash]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;

use ringside_core::RosterId;
use ringside_state::matches::{self, find_match_type};
use ringside_state::{MatchSide, MatchTypeTemplate, ProposedMatch};

/// Arguments for `ringside match`.
#[derive(Args, Debug)]
pub struct MatchArgs {
    #[command(subcommand)]
    pub command: MatchCommand,
}

#[derive(Subcommand, Debug)]
pub enum MatchCommand {
    /// Check a YAML or JSON match card.
    Check {
        /// Path to the match card.
        file: PathBuf,
    },
}

/// A match card as written in a file.
#[derive(Debug, Deserialize)]
pub struct MatchCard {
    /// Catalog slug; omit and give `number_of_sides` / `number_of_competitors`
    /// for a custom match.
    pub match_type: Option<String>,
    pub number_of_sides: Option<usize>,
    pub number_of_competitors: Option<usize>,
    #[serde(default)]
    pub sides: Vec<CardSide>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardSide {
    #[serde(default)]
    pub wrestlers: Vec<String>,
    #[serde(default)]
    pub tag_teams: Vec<String>,
}

impl MatchCard {
    /// Resolve the template and give every named competitor a placeholder id.
    pub fn to_proposed(&self) -> Result<ProposedMatch> {
        let template = match &self.match_type {
            Some(slug) => {
                find_match_type(slug)
                    .ok_or_else(|| anyhow!("unknown match type {slug:?}; see `ringside catalog`"))?
                    .template
            }
            None => MatchTypeTemplate {
                number_of_sides: self.number_of_sides,
                number_of_competitors: self.number_of_competitors,
            },
        };
        let sides = self
            .sides
            .iter()
            .map(|side| MatchSide {
                wrestlers: side.wrestlers.iter().map(|_| RosterId::new()).collect(),
                tag_teams: side.tag_teams.iter().map(|_| RosterId::new()).collect(),
            })
            .collect();
        Ok(ProposedMatch { template, sides })
    }
}

pub fn run_match(args: &MatchArgs) -> Result<u8> {
    match &args.command {
        MatchCommand::Check { file } => {
            let card: MatchCard = crate::read_document(file)?;
            if card.match_type.is_some()
                && (card.number_of_sides.is_some() || card.number_of_competitors.is_some())
            {
                bail!("give either match_type or explicit counts, not both");
            }
            let proposed = card.to_proposed()?;
            match matches::validate(&proposed) {
                Ok(()) => {
                    println!(
                        "OK: {} sides, {} competitors",
                        proposed.sides.len(),
                        matches::competitor_count(&proposed.sides)
                    );
                    Ok(0)
                }
                Err(e) => {
                    println!("INVALID: {e}");
                    Ok(1)
                }
            }
        }
    }
}
