//! Weapon trait inspection.
//!
//! Capacity, reload and ammunition category are read from the weapon's
//! traits and fields the same way for every weapon system.

use ranged_combat_domain::{Ammunition, WeaponData};

const CAPACITY_PREFIX: &str = "capacity-";
const DOUBLE_BARREL: &str = "double-barrel";
const REPEATING: &str = "repeating";

/// Actions per minute of reload time
const ACTIONS_PER_MINUTE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityProfile {
    pub capacity: u32,
    pub is_capacity: bool,
    pub is_double_barrel: bool,
    pub is_repeating: bool,
}

/// Read capacity from traits: `capacity-N` wins, then `double-barrel`,
/// otherwise a single round.
pub fn inspect_traits(traits: &[String]) -> CapacityProfile {
    let has = |name: &str| traits.iter().any(|t| t == name);
    let numeric_capacity = traits
        .iter()
        .filter_map(|t| t.strip_prefix(CAPACITY_PREFIX))
        .find_map(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0);
    let is_double_barrel = has(DOUBLE_BARREL);

    let capacity = match numeric_capacity {
        Some(n) => n,
        None if is_double_barrel => 2,
        None => 1,
    };

    CapacityProfile {
        capacity,
        is_capacity: numeric_capacity.is_some(),
        is_double_barrel,
        is_repeating: has(REPEATING),
    }
}

/// Parse a reload entry into actions. `None` means the weapon is never
/// reloaded ("-" or absent).
pub fn parse_reload(reload: Option<&str>) -> Option<u32> {
    let reload = reload?.trim();
    if reload.is_empty() || reload == "-" || reload == "—" {
        return None;
    }
    let digits: String = reload.chars().take_while(char::is_ascii_digit).collect();
    let amount: u32 = digits.parse().ok()?;
    if reload[digits.len()..].trim_start().starts_with("min") {
        Some(amount * ACTIONS_PER_MINUTE)
    } else {
        Some(amount)
    }
}

/// Ammunition category a weapon fires, from its native slot or its
/// group/base item.
pub fn ammunition_category(data: &WeaponData) -> Option<String> {
    if let Some(category) = data.ammunition.as_ref().and_then(|a| a.category.clone()) {
        return Some(category);
    }
    if data.base_item.as_deref() == Some("blowgun") {
        return Some("blowgun-darts".to_string());
    }
    let category = match data.group.as_deref()? {
        "bow" => "arrows",
        "crossbow" => "bolts",
        "firearm" => "rounds",
        "sling" => "sling-bullets",
        _ => return None,
    };
    Some(category.to_string())
}

/// Whether a weapon of `category` can load `ammunition`. Repeating weapons
/// only take magazines; everything else only takes single rounds.
pub fn accepts(category: Option<&str>, is_repeating: bool, ammunition: &Ammunition) -> bool {
    let Some(category) = category else {
        return false;
    };
    if ammunition.category.as_deref() != Some(category) {
        return false;
    }
    ammunition.is_magazine() == is_repeating
}
