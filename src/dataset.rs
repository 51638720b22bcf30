use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

/// Side a team is analyzed on for a given match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Home,
    Away,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Home => f.write_str("home"),
            Role::Away => f.write_str("away"),
        }
    }
}

/// One finished match. Field names follow the football-data.co.uk column
/// vocabulary (FTHG/FTAG full-time goals, HS/AS shots, HST/AST on target).
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_shots: u32,
    pub away_shots: u32,
    pub home_shots_on_target: u32,
    pub away_shots_on_target: u32,
}

impl MatchRecord {
    pub fn team(&self, role: Role) -> &str {
        match role {
            Role::Home => &self.home_team,
            Role::Away => &self.away_team,
        }
    }

    pub fn goals_for(&self, role: Role) -> u32 {
        match role {
            Role::Home => self.home_goals,
            Role::Away => self.away_goals,
        }
    }

    pub fn goals_against(&self, role: Role) -> u32 {
        match role {
            Role::Home => self.away_goals,
            Role::Away => self.home_goals,
        }
    }

    pub fn shots_for(&self, role: Role) -> u32 {
        match role {
            Role::Home => self.home_shots,
            Role::Away => self.away_shots,
        }
    }

    pub fn shots_on_target_for(&self, role: Role) -> u32 {
        match role {
            Role::Home => self.home_shots_on_target,
            Role::Away => self.away_shots_on_target,
        }
    }
}

/// Past results in chronological order. Season files from football-data are
/// written in match-date order, so file order doubles as the timeline; the
/// same holds for histories assembled in memory.
#[derive(Debug, Clone, Default)]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
}

impl MatchHistory {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("open match dataset {}", path.display()))?;
        Self::from_csv(reader)
    }

    pub fn from_csv_reader<R: Read>(input: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers().context("read dataset header row")?.clone();
        let columns = DatasetColumns::locate(&headers)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in reader.records() {
            let row = row.context("read dataset row")?;
            match columns.parse_row(&row) {
                Some(record) => records.push(record),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, kept = records.len(), "dropped unparseable dataset rows");
        }
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent `lookback` matches `team` played in `role`, oldest
    /// first. Fewer may be returned when the team has a short record.
    pub fn recent_for(&self, team: &str, role: Role, lookback: usize) -> Vec<&MatchRecord> {
        let mut out: Vec<&MatchRecord> = self
            .records
            .iter()
            .filter(|m| m.team(role) == team)
            .collect();
        let keep_from = out.len().saturating_sub(lookback);
        out.split_off(keep_from)
    }

    /// Sorted unique team names across both sides of the dataset.
    pub fn teams(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for m in &self.records {
            names.insert(m.home_team.clone());
            names.insert(m.away_team.clone());
        }
        names.into_iter().collect()
    }

    /// First and last match dates, when the dataset carries parseable dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|m| m.date);
        let first = dates.next()?;
        let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some((lo, hi))
    }
}

struct DatasetColumns {
    date: Option<usize>,
    home_team: usize,
    away_team: usize,
    home_goals: usize,
    away_goals: usize,
    home_shots: usize,
    away_shots: usize,
    home_shots_on_target: usize,
    away_shots_on_target: usize,
}

impl DatasetColumns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require =
            |name: &str| find(name).ok_or_else(|| anyhow!("dataset is missing the {name} column"));
        Ok(Self {
            date: find("Date"),
            home_team: require("HomeTeam")?,
            away_team: require("AwayTeam")?,
            home_goals: require("FTHG")?,
            away_goals: require("FTAG")?,
            home_shots: require("HS")?,
            away_shots: require("AS")?,
            home_shots_on_target: require("HST")?,
            away_shots_on_target: require("AST")?,
        })
    }

    fn parse_row(&self, row: &StringRecord) -> Option<MatchRecord> {
        let cell = |idx: usize| row.get(idx).map(str::trim);
        let count = |idx: usize| cell(idx)?.parse::<u32>().ok();

        let home_team = cell(self.home_team)?.to_string();
        let away_team = cell(self.away_team)?.to_string();
        if home_team.is_empty() || away_team.is_empty() {
            return None;
        }

        Some(MatchRecord {
            date: self.date.and_then(cell).and_then(parse_date),
            home_team,
            away_team,
            home_goals: count(self.home_goals)?,
            away_goals: count(self.away_goals)?,
            home_shots: count(self.home_shots)?,
            away_shots: count(self.away_shots)?,
            home_shots_on_target: count(self.home_shots_on_target)?,
            away_shots_on_target: count(self.away_shots_on_target)?,
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // football-data switched between two-digit and four-digit years over the
    // seasons; accept both.
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%y"))
        .ok()
}
