//! # Replay Subcommand
//!
//! Runs a lifecycle script against a fresh in-memory roster whose clock
//! starts at the script's `start` and only moves on `advance` steps.
//! Entries are referred to by alias (`as:`), defaulting to their name.
//!
//! ```yaml
//! start: "2026-01-01T00:00:00Z"
//! steps:
//!   - { op: register, kind: wrestler, name: Bret Hart, as: bret }
//!   - { op: register, kind: wrestler, name: Jim Neidhart, as: jim }
//!   - { op: transition, action: employ, target: bret }
//!   - { op: transition, action: employ, target: jim, at: "2026-01-10T00:00:00Z" }
//!   - { op: expect, target: jim, status: pending_employment }
//!   - { op: advance, days: 10 }
//!   - { op: form_tag_team, name: The Hart Foundation, wrestlers: [bret, jim], as: harts }
//!   - { op: transition, action: suspend, target: bret }
//!   - { op: expect, target: harts, status: suspended }
//!   - { op: transition, action: suspend, target: bret, expect_error: true }
//! ```
//!
//! Exit code 0 when every step behaved as expected, 1 otherwise.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Deserialize;

use ringside_core::{FixedClock, RosterId, RosterKind, RosterName, Timestamp};
use ringside_state::matches::find_match_type;
use ringside_state::{
    EntrySnapshot, LifecycleEngine, MatchSide, MemoryRosterStore, ProposedMatch, RosterStatus,
    Transition,
};

/// Arguments for `ringside replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the YAML or JSON script.
    pub script: PathBuf,

    /// Print the final roster with interval histories as JSON.
    #[arg(long)]
    pub json: bool,
}

/// A replay script.
#[derive(Debug, Deserialize)]
pub struct Script {
    /// Initial clock reading.
    pub start: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One script step.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Register {
        kind: String,
        name: String,
        #[serde(rename = "as")]
        alias: Option<String>,
    },
    Transition {
        action: String,
        target: String,
        at: Option<String>,
        #[serde(default)]
        expect_error: bool,
    },
    FormTagTeam {
        name: String,
        wrestlers: Vec<String>,
        started_at: Option<String>,
        #[serde(rename = "as")]
        alias: Option<String>,
        #[serde(default)]
        expect_error: bool,
    },
    FormStable {
        name: String,
        #[serde(default)]
        wrestlers: Vec<String>,
        #[serde(default)]
        tag_teams: Vec<String>,
        started_at: Option<String>,
        #[serde(rename = "as")]
        alias: Option<String>,
        #[serde(default)]
        expect_error: bool,
    },
    AddMember {
        composite: String,
        participant: String,
        at: Option<String>,
        #[serde(default)]
        expect_error: bool,
    },
    RemoveMember {
        composite: String,
        participant: String,
        at: Option<String>,
        #[serde(default)]
        expect_error: bool,
    },
    Delete {
        target: String,
    },
    Restore {
        target: String,
    },
    /// Move the clock forward and refresh every cached status.
    Advance {
        days: i64,
    },
    /// Assert a status, by machine name (`pending_employment`) or label.
    Expect {
        target: String,
        status: String,
    },
    CheckMatch {
        match_type: String,
        sides: Vec<ScriptSide>,
        #[serde(default)]
        expect_error: bool,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct ScriptSide {
    #[serde(default)]
    pub wrestlers: Vec<String>,
    #[serde(default)]
    pub tag_teams: Vec<String>,
}

/// Result of a finished replay.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// Steps that did not behave as the script expected.
    pub failures: usize,
    /// Every entry with its interval history, in alias order of registration.
    pub roster: Vec<EntrySnapshot>,
}

pub fn run_replay(args: &ReplayArgs) -> Result<u8> {
    let script: Script = crate::read_document(&args.script)?;
    let outcome = run_script(&script)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.roster)?);
    } else {
        for snapshot in &outcome.roster {
            let entry = &snapshot.entry;
            println!(
                "{:<32} {:<9} {}",
                entry.name.to_string(),
                entry.kind.to_string(),
                entry.status.label(entry.kind)
            );
        }
    }

    if outcome.failures > 0 {
        println!("{} step(s) failed", outcome.failures);
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Run every step of `script`. Malformed steps (unknown alias, bad date)
/// abort with an error; unexpected outcomes are counted as failures.
pub fn run_script(script: &Script) -> Result<ReplayOutcome> {
    let start = Timestamp::parse(&script.start).context("start")?;
    let mut replay = Replay::new(start);
    for (index, step) in script.steps.iter().enumerate() {
        replay
            .step(index + 1, step)
            .with_context(|| format!("step {}", index + 1))?;
    }
    let roster = replay.engine.snapshots(&replay.order);
    Ok(ReplayOutcome {
        failures: replay.failures,
        roster,
    })
}

struct Replay {
    engine: LifecycleEngine<MemoryRosterStore>,
    clock: Arc<FixedClock>,
    aliases: HashMap<String, RosterId>,
    order: Vec<RosterId>,
    failures: usize,
}

impl Replay {
    fn new(start: Timestamp) -> Self {
        let clock = Arc::new(FixedClock::new(start));
        Self {
            engine: LifecycleEngine::new(MemoryRosterStore::new(), clock.clone()),
            clock,
            aliases: HashMap::new(),
            order: Vec::new(),
            failures: 0,
        }
    }

    fn resolve(&self, alias: &str) -> Result<RosterId> {
        self.aliases
            .get(alias)
            .copied()
            .ok_or_else(|| anyhow!("unknown alias {alias:?}"))
    }

    fn resolve_all(&self, aliases: &[String]) -> Result<Vec<RosterId>> {
        aliases.iter().map(|a| self.resolve(a)).collect()
    }

    fn remember(&mut self, alias: Option<&String>, name: &str, id: RosterId) {
        let alias = alias.cloned().unwrap_or_else(|| name.to_string());
        self.aliases.insert(alias, id);
        self.order.push(id);
    }

    /// Compare an outcome with the script's expectation. Returns the value
    /// when the step succeeded.
    fn judge<T, E: Display>(&mut self, index: usize, what: &str, result: Result<T, E>, expect_error: bool) -> Option<T> {
        match (result, expect_error) {
            (Ok(value), false) => {
                tracing::info!(step = index, "{what}");
                Some(value)
            }
            (Err(e), true) => {
                tracing::info!(step = index, "{what}: refused as expected ({e})");
                None
            }
            (Ok(value), true) => {
                println!("FAIL step {index}: {what} succeeded but was expected to fail");
                self.failures += 1;
                Some(value)
            }
            (Err(e), false) => {
                println!("FAIL step {index}: {what}: {e}");
                self.failures += 1;
                None
            }
        }
    }

    fn step(&mut self, index: usize, step: &Step) -> Result<()> {
        match step {
            Step::Register { kind, name, alias } => {
                let kind: RosterKind = kind.parse()?;
                let entry = self.engine.register(kind, RosterName::new(name.as_str())?)?;
                self.remember(alias.as_ref(), name, entry.id);
            }
            Step::Transition {
                action,
                target,
                at,
                expect_error,
            } => {
                let transition = Transition::from_action(action)
                    .ok_or_else(|| anyhow!("unknown action {action:?}"))?;
                let id = self.resolve(target)?;
                let at = parse_at(at.as_deref())?;
                let result = self.engine.transition(id, transition, at);
                self.judge(index, &format!("{action} {target}"), result, *expect_error);
            }
            Step::FormTagTeam {
                name,
                wrestlers,
                started_at,
                alias,
                expect_error,
            } => {
                let wrestlers = self.resolve_all(wrestlers)?;
                let started_at = parse_at(started_at.as_deref())?;
                let result = self
                    .engine
                    .form_tag_team(RosterName::new(name.as_str())?, &wrestlers, started_at);
                if let Some(entry) = self.judge(index, &format!("form tag team {name}"), result, *expect_error) {
                    self.remember(alias.as_ref(), name, entry.id);
                }
            }
            Step::FormStable {
                name,
                wrestlers,
                tag_teams,
                started_at,
                alias,
                expect_error,
            } => {
                let wrestlers = self.resolve_all(wrestlers)?;
                let tag_teams = self.resolve_all(tag_teams)?;
                let started_at = parse_at(started_at.as_deref())?;
                let result = self.engine.form_stable(
                    RosterName::new(name.as_str())?,
                    &wrestlers,
                    &tag_teams,
                    started_at,
                );
                if let Some(entry) = self.judge(index, &format!("form stable {name}"), result, *expect_error) {
                    self.remember(alias.as_ref(), name, entry.id);
                }
            }
            Step::AddMember {
                composite,
                participant,
                at,
                expect_error,
            } => {
                let (c, p) = (self.resolve(composite)?, self.resolve(participant)?);
                let result = self.engine.add_member(c, p, parse_at(at.as_deref())?);
                self.judge(index, &format!("add {participant} to {composite}"), result, *expect_error);
            }
            Step::RemoveMember {
                composite,
                participant,
                at,
                expect_error,
            } => {
                let (c, p) = (self.resolve(composite)?, self.resolve(participant)?);
                let result = self.engine.remove_member(c, p, parse_at(at.as_deref())?);
                self.judge(index, &format!("remove {participant} from {composite}"), result, *expect_error);
            }
            Step::Delete { target } => {
                let result = self.engine.soft_delete(self.resolve(target)?);
                self.judge(index, &format!("delete {target}"), result, false);
            }
            Step::Restore { target } => {
                let result = self.engine.restore(self.resolve(target)?);
                self.judge(index, &format!("restore {target}"), result, false);
            }
            Step::Advance { days } => {
                self.clock.advance_days(*days);
                let changed = self.engine.refresh_all();
                tracing::info!(step = index, days, changed = changed.len(), "advanced clock");
            }
            Step::Expect { target, status } => {
                let id = self.resolve(target)?;
                let entry = self
                    .engine
                    .get(id)
                    .ok_or_else(|| anyhow!("{target} is deleted"))?;
                if !status_matches(entry.status, entry.kind, status) {
                    println!(
                        "FAIL step {index}: {target} is {} ({}), expected {status}",
                        entry.status,
                        entry.status.label(entry.kind)
                    );
                    self.failures += 1;
                }
            }
            Step::CheckMatch {
                match_type,
                sides,
                expect_error,
            } => {
                let template = find_match_type(match_type)
                    .ok_or_else(|| anyhow!("unknown match type {match_type:?}"))?
                    .template;
                let sides = sides
                    .iter()
                    .map(|side| {
                        Ok(MatchSide {
                            wrestlers: self.resolve_all(&side.wrestlers)?,
                            tag_teams: self.resolve_all(&side.tag_teams)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let result = self.engine.check_match(&ProposedMatch { template, sides });
                self.judge(index, &format!("check {match_type} match"), result, *expect_error);
            }
        }
        Ok(())
    }
}

fn parse_at(at: Option<&str>) -> Result<Option<Timestamp>> {
    Ok(at.map(Timestamp::parse).transpose()?)
}

fn status_matches(status: RosterStatus, kind: RosterKind, expected: &str) -> bool {
    status.as_str() == expected || status.label(kind).eq_ignore_ascii_case(expected)
}
