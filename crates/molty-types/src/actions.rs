//! The action produced by the decision engine and its wire request.
//!
//! [`Action`] is what the policy reasons about. [`ActionRequest`] is the
//! JSON body the game API expects for `POST .../action`:
//!
//! ```text
//! {"action": "useItem", "target": "potion-1", "targetId": "potion-1"}
//! ```

use serde::{Deserialize, Serialize};

use crate::enums::ActionType;
use crate::ids::{Direction, ItemId, UnitId};

/// Exactly one of these is produced per decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Move to the adjacent region behind this direction.
    Move(Direction),
    /// Search the current region.
    Explore,
    /// Attack a co-located unit.
    Attack(UnitId),
    /// Consume an inventory item.
    UseItem(ItemId),
    /// Pick up a ground item.
    Pickup(ItemId),
    /// Equip an inventory weapon.
    Equip(ItemId),
    /// Recover energy.
    Rest,
}

impl Action {
    /// The wire action type.
    pub const fn action_type(&self) -> ActionType {
        match self {
            Self::Move(_) => ActionType::Move,
            Self::Explore => ActionType::Explore,
            Self::Attack(_) => ActionType::Attack,
            Self::UseItem(_) => ActionType::UseItem,
            Self::Pickup(_) => ActionType::Pickup,
            Self::Equip(_) => ActionType::Equip,
            Self::Rest => ActionType::Rest,
        }
    }

    /// The target string sent alongside the action, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Move(direction) => Some(direction.as_str()),
            Self::Attack(unit) => Some(unit.as_str()),
            Self::UseItem(item) | Self::Pickup(item) | Self::Equip(item) => Some(item.as_str()),
            Self::Explore | Self::Rest => None,
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{}({target})", self.action_type().as_str()),
            None => f.write_str(self.action_type().as_str()),
        }
    }
}

/// JSON body for an action submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    /// Wire action type.
    pub action: ActionType,
    /// Direction or entity id, omitted for untargeted actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Item id repeated for `useItem`, which the server reads from the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl From<&Action> for ActionRequest {
    fn from(action: &Action) -> Self {
        let target = action.target().map(ToOwned::to_owned);
        let target_id = match action {
            Action::UseItem(item) => Some(item.as_str().to_owned()),
            _ => None,
        };
        Self {
            action: action.action_type(),
            target,
            target_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_request_has_no_target() {
        let body = serde_json::to_value(ActionRequest::from(&Action::Rest)).unwrap_or_default();
        assert_eq!(body, serde_json::json!({"action": "rest"}));
    }

    #[test]
    fn use_item_repeats_target_id() {
        let action = Action::UseItem(ItemId::new("potion-1"));
        let body = serde_json::to_value(ActionRequest::from(&action)).unwrap_or_default();
        assert_eq!(
            body,
            serde_json::json!({"action": "useItem", "target": "potion-1", "targetId": "potion-1"})
        );
    }

    #[test]
    fn move_targets_direction() {
        let action = Action::Move(Direction::new("north"));
        assert_eq!(action.target(), Some("north"));
        assert_eq!(action.to_string(), "move(north)");
    }
}
