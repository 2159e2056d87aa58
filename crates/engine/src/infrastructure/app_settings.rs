//! Engine settings and per-actor capability resolution
//!
//! Settings are world-level toggles the host exposes to the game master.
//! They are read once at composition and resolved per actor into an
//! [`ActorCapabilities`] descriptor, which is the only thing weapon systems
//! consult when deciding which of them owns an actor.
//!
//! # Environment
//!
//! `EngineSettings::from_env()` reads `RANGED_COMBAT_*` variables. Unset
//! variables keep their defaults; unparseable values are logged and ignored.

use serde::{Deserialize, Serialize};

use ranged_combat_domain::{Actor, ActorKind};

const ENV_HOST_SUBITEM_AMMUNITION: &str = "RANGED_COMBAT_HOST_SUBITEM_AMMUNITION";
const ENV_ADVANCED_FOR_CHARACTERS: &str = "RANGED_COMBAT_ADVANCED_AMMUNITION";
const ENV_NPC_TRACKING: &str = "RANGED_COMBAT_NPC_AMMUNITION_TRACKING";
const ENV_FLOATING_TEXT: &str = "RANGED_COMBAT_FLOATING_TEXT";
const ENV_AUTO_SELECT_CHAMBER: &str = "RANGED_COMBAT_AUTO_SELECT_CHAMBER";

// ============================================================================
// NPC Ammunition Tracking
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NpcAmmunitionTracking {
    /// One preferred stack, rounds stay in the inventory until fired.
    #[default]
    Simple,
    /// Same effect-backed tracking as player characters.
    Advanced,

    /// Forward-compatibility fallback for newer variants.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for NpcAmmunitionTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NpcAmmunitionTracking::Simple => write!(f, "simple"),
            NpcAmmunitionTracking::Advanced => write!(f, "advanced"),
            NpcAmmunitionTracking::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for NpcAmmunitionTracking {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" | "basic" => Ok(NpcAmmunitionTracking::Simple),
            "advanced" | "full" => Ok(NpcAmmunitionTracking::Advanced),
            _ => Err(()),
        }
    }
}

// ============================================================================
// Engine Settings
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineSettings {
    /// The host tracks loaded ammunition as weapon sub-items
    #[serde(default)]
    pub host_subitem_ammunition: bool,

    /// Player characters use effect-backed ammunition tracking
    #[serde(default = "default_true")]
    pub advanced_ammunition_for_characters: bool,

    #[serde(default)]
    pub npc_ammunition_tracking: NpcAmmunitionTracking,

    /// Show floating combat text when loadouts change
    #[serde(default = "default_true")]
    pub floating_combat_text: bool,

    /// Capacity weapons select a freshly loaded round when nothing is selected
    #[serde(default = "default_true")]
    pub auto_select_chamber: bool,
}

fn default_true() -> bool {
    true
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            host_subitem_ammunition: false,
            advanced_ammunition_for_characters: true,
            npc_ammunition_tracking: NpcAmmunitionTracking::Simple,
            floating_combat_text: true,
            auto_select_chamber: true,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, starting from defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        let flag = |key: &str, target: &mut bool| {
            if let Some(raw) = lookup(key) {
                match parse_bool(&raw) {
                    Some(value) => *target = value,
                    None => tracing::warn!(key, value = %raw, "Ignoring invalid boolean setting"),
                }
            }
        };
        flag(
            ENV_HOST_SUBITEM_AMMUNITION,
            &mut settings.host_subitem_ammunition,
        );
        flag(
            ENV_ADVANCED_FOR_CHARACTERS,
            &mut settings.advanced_ammunition_for_characters,
        );
        flag(ENV_FLOATING_TEXT, &mut settings.floating_combat_text);
        flag(ENV_AUTO_SELECT_CHAMBER, &mut settings.auto_select_chamber);

        if let Some(raw) = lookup(ENV_NPC_TRACKING) {
            match raw.parse() {
                Ok(tracking) => settings.npc_ammunition_tracking = tracking,
                Err(()) => tracing::warn!(
                    key = ENV_NPC_TRACKING,
                    value = %raw,
                    "Ignoring invalid NPC ammunition tracking setting"
                ),
            }
        }

        settings
    }

    /// Resolve the capabilities that apply to one actor.
    pub fn capabilities_for(&self, actor: &Actor) -> ActorCapabilities {
        let advanced_ammunition = match actor.kind {
            ActorKind::Character => self.advanced_ammunition_for_characters,
            ActorKind::Npc => self.npc_ammunition_tracking == NpcAmmunitionTracking::Advanced,
            ActorKind::Familiar => false,
        };
        ActorCapabilities {
            kind: actor.kind,
            host_subitem_ammunition: self.host_subitem_ammunition,
            advanced_ammunition,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Everything that decides how an actor's ammunition is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorCapabilities {
    pub kind: ActorKind,
    pub host_subitem_ammunition: bool,
    pub advanced_ammunition: bool,
}
