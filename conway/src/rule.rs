// rule.rs - Birth and survival ranges for a totalistic life-like rule

use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// A dead cell with `birth_min..=birth_max` live neighbours is born; a live
/// cell with `alive_min..=alive_max` live neighbours survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub birth_min: u8,
    pub birth_max: u8,
    pub alive_min: u8,
    pub alive_max: u8,
}

impl Rule {
    /// B3/S23
    pub const CONWAY: Rule = Rule {
        birth_min: 3,
        birth_max: 3,
        alive_min: 2,
        alive_max: 3,
    };

    pub fn validate(&self) -> EngineResult<()> {
        if self.birth_min > self.birth_max || self.alive_min > self.alive_max {
            return Err(EngineError::rule(format!("empty range in {self:?}")));
        }
        if self.birth_max > 8 || self.alive_max > 8 {
            return Err(EngineError::rule(format!("neighbour count above 8 in {self:?}")));
        }
        Ok(())
    }

    pub fn next(&self, alive: bool, neighbours: u8) -> bool {
        if alive {
            (self.alive_min..=self.alive_max).contains(&neighbours)
        } else {
            (self.birth_min..=self.birth_max).contains(&neighbours)
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::CONWAY
    }
}
