//! Picking the weapon or ammunition an action applies to.

use ranged_combat_domain::{Actor, InventoryAmmunition, ItemId, Weapon};

use super::ActionPorts;
use crate::infrastructure::ports::{ChoiceOption, ChoicePrompt};

pub(super) enum Choice<T> {
    Picked(T),
    /// The user dismissed the prompt
    Declined,
    /// Nothing to choose from
    Empty,
}

/// Pick one of `candidates`: the requested one, the only one, or whichever
/// the user chooses.
pub(super) async fn select_weapon(
    ports: &ActionPorts,
    actor: &Actor,
    mut candidates: Vec<Weapon>,
    requested: Option<ItemId>,
    title: &str,
) -> Choice<Weapon> {
    if let Some(id) = requested {
        return match candidates.into_iter().find(|w| w.id == id) {
            Some(weapon) => Choice::Picked(weapon),
            None => Choice::Empty,
        };
    }
    match candidates.len() {
        0 => return Choice::Empty,
        1 => return Choice::Picked(candidates.remove(0)),
        _ => {}
    }

    let options = candidates
        .iter()
        .map(|w| ChoiceOption {
            id: w.id,
            name: w.name.clone(),
            img: w.img.clone(),
            hint: None,
        })
        .collect();
    let prompt = ChoicePrompt {
        title: title.to_string(),
        options,
    };
    match ports.prompt.choose(actor.id, prompt).await {
        Some(id) => match candidates.into_iter().find(|w| w.id == id) {
            Some(weapon) => Choice::Picked(weapon),
            None => Choice::Declined,
        },
        None => Choice::Declined,
    }
}

/// Pick the stack to load: the only one, the weapon's selected one, or
/// whichever the user chooses.
pub(super) async fn select_ammunition(
    ports: &ActionPorts,
    actor: &Actor,
    weapon: &Weapon,
    mut candidates: Vec<InventoryAmmunition>,
    title: &str,
) -> Choice<InventoryAmmunition> {
    if candidates.is_empty() {
        return Choice::Empty;
    }
    if candidates.len() == 1 {
        return Choice::Picked(candidates.remove(0));
    }
    if let Some(selected) = weapon.selected_ammunition_id {
        if let Some(index) = candidates.iter().position(|a| a.ammunition.id == selected) {
            return Choice::Picked(candidates.remove(index));
        }
    }

    let options = candidates
        .iter()
        .map(|a| ChoiceOption {
            id: a.ammunition.id,
            name: a.ammunition.name.clone(),
            img: a.ammunition.img.clone(),
            hint: Some(match a.ammunition.uses {
                Some(uses) if uses.max > 1 => {
                    format!("{} x{} ({}/{})", a.ammunition.quantity, uses.max, uses.value, uses.max)
                }
                _ => format!("x{}", a.ammunition.quantity),
            }),
        })
        .collect();
    let prompt = ChoicePrompt {
        title: format!("{title} ({})", weapon.name),
        options,
    };
    match ports.prompt.choose(actor.id, prompt).await {
        Some(id) => match candidates.into_iter().find(|a| a.ammunition.id == id) {
            Some(stack) => Choice::Picked(stack),
            None => Choice::Declined,
        },
        None => Choice::Declined,
    }
}
