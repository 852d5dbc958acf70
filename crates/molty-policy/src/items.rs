//! Item management: healing need and best-item selection.
//!
//! All selections return the *first* maximum in list order, so ties are
//! broken by server order and a strictly unique maximum is found no matter
//! where it sits.

use molty_types::{GroundItem, Item, ItemCategory, Vitals};

/// Maximum number of inventory entries the policy will fill.
pub const INVENTORY_CAPACITY: usize = 10;

/// Below this hp percentage healing is needed unconditionally.
const CRITICAL_HP_PERCENT: u64 = 30;

/// Below this hp percentage healing is needed when ep allows.
const LOW_HP_PERCENT: u64 = 50;

/// Energy required for non-critical healing.
const HEAL_MIN_EP: u32 = 1;

/// Whether the agent should drink a recovery item this turn.
///
/// True below 30% hp, or below 50% hp with at least 1 ep. Computed in
/// integer arithmetic; an agent reporting `max_hp == 0` never needs healing.
pub fn need_healing(me: &Vitals) -> bool {
    let scaled_hp = u64::from(me.hp).saturating_mul(100);
    let max_hp = u64::from(me.max_hp);

    if scaled_hp < max_hp.saturating_mul(CRITICAL_HP_PERCENT) {
        return true;
    }
    scaled_hp < max_hp.saturating_mul(LOW_HP_PERCENT) && me.ep >= HEAL_MIN_EP
}

/// Recovery item with the highest hp restore.
pub fn best_healing_item(inventory: &[Item]) -> Option<&Item> {
    first_max_by_key(
        inventory
            .iter()
            .filter(|item| item.category == ItemCategory::Recovery),
        |item| item.hp_restore,
    )
}

/// Weapon with the highest attack bonus.
pub fn best_weapon(inventory: &[Item]) -> Option<&Item> {
    first_max_by_key(
        inventory
            .iter()
            .filter(|item| item.category == ItemCategory::Weapon),
        |item| item.attack_bonus,
    )
}

/// Ground item with the highest value.
pub fn best_ground_item(items: &[GroundItem]) -> Option<&GroundItem> {
    first_max_by_key(items.iter(), |item| item.value)
}

/// Whether the inventory has room for one more pickup.
pub const fn has_room(inventory: &[Item]) -> bool {
    inventory.len() < INVENTORY_CAPACITY
}

/// Return the first element with the greatest key.
///
/// [`Iterator::max_by_key`] returns the *last* maximum; the policy needs
/// the first one, so a later element only wins with a strictly greater key.
pub fn first_max_by_key<T, K, I, F>(items: I, key: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut best: Option<(T, K)> = None;
    for item in items {
        let k = key(&item);
        let better = best.as_ref().is_none_or(|(_, best_key)| k > *best_key);
        if better {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ground, potion, snapshot, weapon};

    fn vitals(hp: u32, max_hp: u32, ep: u32) -> Vitals {
        Vitals {
            hp,
            max_hp,
            ep,
            ..snapshot().vitals
        }
    }

    #[test]
    fn healing_thresholds() {
        assert!(need_healing(&vitals(29, 100, 0)));
        assert!(!need_healing(&vitals(30, 100, 0)));
        assert!(need_healing(&vitals(49, 100, 1)));
        assert!(!need_healing(&vitals(49, 100, 0)));
        assert!(!need_healing(&vitals(50, 100, 5)));
        assert!(!need_healing(&vitals(0, 0, 5)));
    }

    #[test]
    fn unique_maximum_found_in_any_order() {
        let base = vec![
            potion("p10", 10),
            weapon("w5", 5),
            potion("p50", 50),
            weapon("w30", 30),
            potion("p20", 20),
        ];
        for shift in 0..base.len() {
            let mut rotated = base.clone();
            rotated.rotate_left(shift);
            assert_eq!(
                best_healing_item(&rotated).map(|i| i.id.as_str()),
                Some("p50")
            );
            assert_eq!(best_weapon(&rotated).map(|i| i.id.as_str()), Some("w30"));

            rotated.reverse();
            assert_eq!(
                best_healing_item(&rotated).map(|i| i.id.as_str()),
                Some("p50")
            );
            assert_eq!(best_weapon(&rotated).map(|i| i.id.as_str()), Some("w30"));
        }
    }

    #[test]
    fn ties_keep_first_encountered() {
        let inventory = vec![potion("first", 40), potion("second", 40)];
        assert_eq!(
            best_healing_item(&inventory).map(|i| i.id.as_str()),
            Some("first")
        );

        let loot = vec![ground("a", 7), ground("b", 9), ground("c", 9)];
        assert_eq!(best_ground_item(&loot).map(|i| i.id.as_str()), Some("b"));
    }

    #[test]
    fn missing_category_selects_nothing() {
        let inventory = vec![weapon("w", 3)];
        assert!(best_healing_item(&inventory).is_none());
        assert!(best_weapon(&[]).is_none());
    }

    #[test]
    fn capacity() {
        let full: Vec<Item> = (0..INVENTORY_CAPACITY)
            .map(|n| potion(&format!("p{n}"), 1))
            .collect();
        assert!(!has_room(&full));
        assert!(has_room(full.get(1..).unwrap_or_default()));
    }
}
