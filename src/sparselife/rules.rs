//! Survival/birth rule tables for life-like automata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::RuleError;

/// Number of distinct neighbor counts, `0..=8`.
pub const RULE_TABLE_LEN: usize = 9;

/// Survival and birth tables indexed by live-neighbor count.
///
/// `survival[n]` keeps a living cell with `n` neighbors alive; `birth[n]`
/// brings a dead cell with `n` neighbors to life. Serialized as a rulestring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleTable {
    survival: [bool; RULE_TABLE_LEN],
    birth: [bool; RULE_TABLE_LEN],
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::conway()
    }
}

impl RuleTable {
    pub const fn new(survival: [bool; RULE_TABLE_LEN], birth: [bool; RULE_TABLE_LEN]) -> Self {
        Self { survival, birth }
    }

    const fn from_counts(birth: &[u8], survival: &[u8]) -> Self {
        let mut table = Self {
            survival: [false; RULE_TABLE_LEN],
            birth: [false; RULE_TABLE_LEN],
        };
        let mut i = 0;
        while i < birth.len() {
            table.birth[birth[i] as usize] = true;
            i += 1;
        }
        let mut i = 0;
        while i < survival.len() {
            table.survival[survival[i] as usize] = true;
            i += 1;
        }
        table
    }

    /// B3/S23.
    pub const fn conway() -> Self {
        Self::from_counts(&[3], &[2, 3])
    }

    /// B36/S23.
    pub const fn high_life() -> Self {
        Self::from_counts(&[3, 6], &[2, 3])
    }

    /// B3678/S34678.
    pub const fn day_and_night() -> Self {
        Self::from_counts(&[3, 6, 7, 8], &[3, 4, 6, 7, 8])
    }

    /// B2/S: every live cell dies each generation.
    pub const fn seeds() -> Self {
        Self::from_counts(&[2], &[])
    }

    /// B3/S12345.
    pub const fn maze() -> Self {
        Self::from_counts(&[3], &[1, 2, 3, 4, 5])
    }

    pub const fn survival(&self) -> &[bool; RULE_TABLE_LEN] {
        &self.survival
    }

    pub const fn birth(&self) -> &[bool; RULE_TABLE_LEN] {
        &self.birth
    }

    #[inline(always)]
    pub fn survives(&self, neighbors: u8) -> bool {
        self.survival[neighbors as usize]
    }

    #[inline(always)]
    pub fn born(&self, neighbors: u8) -> bool {
        self.birth[neighbors as usize]
    }

    /// Rule-mandated next state for a cell.
    #[inline(always)]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        if alive {
            self.survives(neighbors)
        } else {
            self.born(neighbors)
        }
    }
}

fn parse_counts(rule: &str, digits: &str) -> Result<[bool; RULE_TABLE_LEN], RuleError> {
    let mut table = [false; RULE_TABLE_LEN];
    for found in digits.chars() {
        match found.to_digit(10) {
            Some(n) if (n as usize) < RULE_TABLE_LEN => table[n as usize] = true,
            _ => {
                return Err(RuleError::InvalidCount {
                    rule: rule.to_owned(),
                    found,
                });
            }
        }
    }
    Ok(table)
}

fn is_tagged(part: &str) -> bool {
    part.starts_with(['B', 'b', 'S', 's'])
}

impl FromStr for RuleTable {
    type Err = RuleError;

    /// Accepts `B3/S23`, `S23/B3` (any case) and the legacy `23/3` form,
    /// which lists survival counts first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = s.trim();
        if rule.is_empty() {
            return Err(RuleError::Empty);
        }
        let parts: Vec<&str> = rule.split('/').map(str::trim).collect();
        let [first, second] = parts[..] else {
            return Err(RuleError::Malformed(rule.to_owned()));
        };

        let (birth, survival) = match (is_tagged(first), is_tagged(second)) {
            (true, true) => {
                let mut birth = None;
                let mut survival = None;
                for part in [first, second] {
                    let (tag, digits) = part.split_at(1);
                    let side = tag.to_ascii_uppercase();
                    let slot = if side == "B" { &mut birth } else { &mut survival };
                    if slot.replace(digits).is_some() {
                        let side = if side == "B" { 'B' } else { 'S' };
                        return Err(RuleError::DuplicateSide(rule.to_owned(), side));
                    }
                }
                match (birth, survival) {
                    (Some(b), Some(s)) => (b, s),
                    _ => return Err(RuleError::Malformed(rule.to_owned())),
                }
            }
            (false, false) => (second, first),
            _ => return Err(RuleError::Malformed(rule.to_owned())),
        };

        Ok(Self {
            survival: parse_counts(rule, survival)?,
            birth: parse_counts(rule, birth)?,
        })
    }
}

impl TryFrom<String> for RuleTable {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuleTable> for String {
    fn from(rule: RuleTable) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for (n, _) in self.birth.iter().enumerate().filter(|(_, on)| **on) {
            write!(f, "{n}")?;
        }
        f.write_str("/S")?;
        for (n, _) in self.survival.iter().enumerate().filter(|(_, on)| **on) {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}
