/// Combat balance constants and tunable parameters.
///
/// Compile-time constants size bounded collections; the runtime-tunable
/// fields anchor the damage formulas and per-action prices. Every formula in
/// [`crate::combat`] reads its numbers from here so balance can be adjusted
/// without touching the resolution code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Floor applied to every shadow hit so damage is never fully negated.
    pub min_shadow_damage: u32,
    /// Damage anchor used when the narrative layer supplies no scene difficulty.
    pub base_shadow_damage: u32,
    /// Flat damage of ILLUMINATE before the trust bonus.
    pub illuminate_base_damage: u32,
    /// LightPoints consumed by ILLUMINATE.
    pub illuminate_light_cost: u32,
    /// Energy consumed by ILLUMINATE (before level reductions).
    pub illuminate_energy_cost: u32,
    /// Energy consumed by REFLECT (before level reductions).
    pub reflect_energy_cost: u32,
    /// Energy consumed by EMBRACE (before level reductions).
    pub embrace_energy_cost: u32,
    /// Multiplier applied to incoming damage on the turn after ENDURE.
    pub endure_damage_reduction: f64,
    /// Damage multiplier of the fallback attack used when every ability is cooling down.
    pub weak_attack_multiplier: f64,
    /// Health restored after a victory unless healing is blocked.
    pub victory_heal: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of abilities carried by a single enemy.
    pub const MAX_ABILITIES: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MIN_SHADOW_DAMAGE: u32 = 1;
    pub const DEFAULT_BASE_SHADOW_DAMAGE: u32 = 8;
    pub const DEFAULT_ILLUMINATE_BASE_DAMAGE: u32 = 3;
    pub const DEFAULT_ILLUMINATE_LIGHT_COST: u32 = 2;
    pub const DEFAULT_ILLUMINATE_ENERGY_COST: u32 = 3;
    pub const DEFAULT_REFLECT_ENERGY_COST: u32 = 2;
    pub const DEFAULT_EMBRACE_ENERGY_COST: u32 = 4;
    pub const DEFAULT_ENDURE_DAMAGE_REDUCTION: f64 = 0.5;
    pub const DEFAULT_WEAK_ATTACK_MULTIPLIER: f64 = 0.5;
    pub const DEFAULT_VICTORY_HEAL: u32 = 2;

    pub fn new() -> Self {
        Self {
            min_shadow_damage: Self::DEFAULT_MIN_SHADOW_DAMAGE,
            base_shadow_damage: Self::DEFAULT_BASE_SHADOW_DAMAGE,
            illuminate_base_damage: Self::DEFAULT_ILLUMINATE_BASE_DAMAGE,
            illuminate_light_cost: Self::DEFAULT_ILLUMINATE_LIGHT_COST,
            illuminate_energy_cost: Self::DEFAULT_ILLUMINATE_ENERGY_COST,
            reflect_energy_cost: Self::DEFAULT_REFLECT_ENERGY_COST,
            embrace_energy_cost: Self::DEFAULT_EMBRACE_ENERGY_COST,
            endure_damage_reduction: Self::DEFAULT_ENDURE_DAMAGE_REDUCTION,
            weak_attack_multiplier: Self::DEFAULT_WEAK_ATTACK_MULTIPLIER,
            victory_heal: Self::DEFAULT_VICTORY_HEAL,
        }
    }

    pub fn with_min_shadow_damage(mut self, min_shadow_damage: u32) -> Self {
        self.min_shadow_damage = min_shadow_damage;
        self
    }

    pub fn with_base_shadow_damage(mut self, base_shadow_damage: u32) -> Self {
        self.base_shadow_damage = base_shadow_damage;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
