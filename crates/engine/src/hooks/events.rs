//! Hook payloads.

use ranged_combat_domain::{Actor, Ammunition, Item, ItemId, Weapon};

use crate::entities::updates::Updates;

/// Lifecycle points published by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKey {
    WeaponAttack,
    WeaponDamage,
    Reload,
    AmmunitionFire,
    AuxiliaryActions,
    PostAction,
}

impl HookKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeaponAttack => "weapon-attack",
            Self::WeaponDamage => "weapon-damage",
            Self::Reload => "reload",
            Self::AmmunitionFire => "ammunition-fire",
            Self::AuxiliaryActions => "auxiliary-actions",
            Self::PostAction => "post-action",
        }
    }
}

impl std::fmt::Display for HookKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an auxiliary action does when performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuxiliaryActionKind {
    Reload,
    ReloadMagazine,
    Unload,
    NextChamber,
    SwitchAmmunition,
    ConjureBullet,
    /// Offered by a feat; `fires_weapon` spends ammunition without an attack
    Feat { slug: String, fires_weapon: bool },
}

/// An extra action offered next to a weapon's strikes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryAction {
    pub label: String,
    pub kind: AuxiliaryActionKind,
    /// Actions it costs, when it costs a fixed number
    pub actions: Option<u32>,
}

impl AuxiliaryAction {
    pub fn new(label: impl Into<String>, kind: AuxiliaryActionKind, actions: Option<u32>) -> Self {
        Self {
            label: label.into(),
            kind,
            actions,
        }
    }
}

/// How an action item was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostActionResult {
    Performed,
    WeaponFired { weapon_id: ItemId },
}

/// A published lifecycle event. Subscribers may queue further changes on
/// the carried accumulator.
pub enum HookEvent<'a> {
    WeaponAttack {
        actor: &'a Actor,
        weapon: &'a Weapon,
        updates: &'a mut Updates,
    },
    WeaponDamage {
        actor: &'a Actor,
        weapon: &'a Weapon,
        target: Option<&'a str>,
        updates: &'a mut Updates,
    },
    Reload {
        actor: &'a Actor,
        weapon: &'a Weapon,
        ammunition: &'a Ammunition,
        updates: &'a mut Updates,
    },
    AmmunitionFire {
        actor: &'a Actor,
        weapon: &'a Weapon,
        ammunition: &'a Ammunition,
        updates: &'a mut Updates,
    },
    AuxiliaryActions {
        actor: &'a Actor,
        weapon: &'a Weapon,
        auxiliary_actions: &'a mut Vec<AuxiliaryAction>,
    },
    PostAction {
        actor: &'a Actor,
        item: &'a Item,
        result: PostActionResult,
        updates: &'a mut Updates,
    },
}

impl HookEvent<'_> {
    pub fn key(&self) -> HookKey {
        match self {
            Self::WeaponAttack { .. } => HookKey::WeaponAttack,
            Self::WeaponDamage { .. } => HookKey::WeaponDamage,
            Self::Reload { .. } => HookKey::Reload,
            Self::AmmunitionFire { .. } => HookKey::AmmunitionFire,
            Self::AuxiliaryActions { .. } => HookKey::AuxiliaryActions,
            Self::PostAction { .. } => HookKey::PostAction,
        }
    }

    pub fn actor(&self) -> &Actor {
        match self {
            Self::WeaponAttack { actor, .. }
            | Self::WeaponDamage { actor, .. }
            | Self::Reload { actor, .. }
            | Self::AmmunitionFire { actor, .. }
            | Self::AuxiliaryActions { actor, .. }
            | Self::PostAction { actor, .. } => actor,
        }
    }
}
