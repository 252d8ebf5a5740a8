//! Ambient modifiers that feed combat resolution without being session state.

use crate::config::CombatConfig;
use crate::leveling::LevelBenefits;

/// Read-only inputs to the engine that come from outside the encounter:
/// balance configuration, the narrative trust level and level benefits.
#[derive(Clone, Copy, Debug)]
pub struct CombatEnv<'a> {
    pub config: &'a CombatConfig,
    pub trust_level: u32,
    pub benefits: LevelBenefits,
}

impl<'a> CombatEnv<'a> {
    pub fn new(config: &'a CombatConfig, trust_level: u32) -> Self {
        Self {
            config,
            trust_level,
            benefits: LevelBenefits::NONE,
        }
    }

    #[must_use]
    pub fn with_benefits(mut self, benefits: LevelBenefits) -> Self {
        self.benefits = benefits;
        self
    }
}
