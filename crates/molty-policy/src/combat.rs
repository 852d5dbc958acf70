//! Combat evaluation: when to attack a co-located unit and when to run.
//!
//! Both predicates are deterministic total functions of the agent's
//! vitals and the target stats. Thresholds are kept as constants so they
//! can be found and tuned in one place.

use molty_types::{Unit, Vitals};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Below this hp the agent never starts a fight.
const MIN_ATTACK_HP: u32 = 40;

/// Below this ep the agent cannot afford an attack.
const MIN_ATTACK_EP: u32 = 2;

/// Targets below this hp count as weak.
const WEAK_TARGET_HP: u32 = 30;

/// Attack advantage needed to finish a weak target.
const EASY_KILL_ADVANTAGE: i64 = 5;

/// Attack advantage that justifies engaging a healthy target.
const STRONG_ADVANTAGE: i64 = 15;

/// Own hp required to press a strong advantage.
const STRONG_ADVANTAGE_MIN_HP: u32 = 60;

/// A target out-attacking the agent by more than this is avoided.
const DANGER_MARGIN: u32 = 20;

/// Below this hp the agent flees from any threat.
const FLEE_HP: u32 = 30;

/// A threat whose attack exceeds own defense by more than this is strong.
const STRONG_THREAT_MARGIN: u32 = 15;

/// Number of strong threats that forces a retreat.
const STRONG_THREAT_COUNT: usize = 2;

/// Number of threats of any strength that forces a retreat.
const CROWD_SIZE: usize = 3;

// ---------------------------------------------------------------------------
// Attack
// ---------------------------------------------------------------------------

/// Why the combat evaluator reached its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatReason {
    /// Own hp below the safety floor.
    LowHealth,
    /// Not enough ep to attack.
    LowEnergy,
    /// Weak target and a comfortable attack advantage.
    EasyKill,
    /// Large attack advantage while healthy.
    StrongAdvantage,
    /// Target out-attacks the agent by a wide margin.
    TooDangerous,
    /// No rule favoured attacking.
    NotAdvantageous,
}

impl CombatReason {
    /// Human-readable label for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowHealth => "hp too low",
            Self::LowEnergy => "not enough ep",
            Self::EasyKill => "easy kill",
            Self::StrongAdvantage => "strong advantage",
            Self::TooDangerous => "target too strong",
            Self::NotAdvantageous => "not advantageous",
        }
    }
}

impl core::fmt::Display for CombatReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`should_attack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CombatVerdict {
    /// Whether to attack the target.
    pub engage: bool,
    /// The rule that decided.
    pub reason: CombatReason,
}

impl CombatVerdict {
    const fn attack(reason: CombatReason) -> Self {
        Self {
            engage: true,
            reason,
        }
    }

    const fn refuse(reason: CombatReason) -> Self {
        Self {
            engage: false,
            reason,
        }
    }
}

/// Decide whether to attack `target`.
///
/// Safety floors come first (hp, then ep). Past them, the weak-target,
/// strong-advantage and danger checks are mutually exclusive: only the
/// first whose guard matches is consulted, and anything else refuses.
pub fn should_attack(me: &Vitals, target: &Unit) -> CombatVerdict {
    if me.hp < MIN_ATTACK_HP {
        return CombatVerdict::refuse(CombatReason::LowHealth);
    }
    if me.ep < MIN_ATTACK_EP {
        return CombatVerdict::refuse(CombatReason::LowEnergy);
    }

    let advantage = i64::from(me.attack).saturating_sub(i64::from(target.defense));

    if target.hp < WEAK_TARGET_HP {
        if advantage > EASY_KILL_ADVANTAGE {
            return CombatVerdict::attack(CombatReason::EasyKill);
        }
    } else if advantage > STRONG_ADVANTAGE {
        if me.hp > STRONG_ADVANTAGE_MIN_HP {
            return CombatVerdict::attack(CombatReason::StrongAdvantage);
        }
    } else if target.attack.saturating_sub(me.attack) > DANGER_MARGIN {
        return CombatVerdict::refuse(CombatReason::TooDangerous);
    }

    CombatVerdict::refuse(CombatReason::NotAdvantageous)
}

// ---------------------------------------------------------------------------
// Flee
// ---------------------------------------------------------------------------

/// Decide whether the threats in the region warrant running away.
///
/// An empty threat list never triggers a retreat.
pub fn should_flee(me: &Vitals, threats: &[Unit]) -> bool {
    if threats.is_empty() {
        return false;
    }
    if me.hp < FLEE_HP {
        return true;
    }

    let strong = threats
        .iter()
        .filter(|t| t.attack.saturating_sub(me.defense) > STRONG_THREAT_MARGIN)
        .count();

    strong >= STRONG_THREAT_COUNT || threats.len() >= CROWD_SIZE
}
