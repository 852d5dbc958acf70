//! Normalisation of the agent state response into a [`StateSnapshot`].
//!
//! The game server has shipped several shapes of the state payload. This
//! module is the only place that knows about them:
//!
//! - the `{success, data}` envelope, or the bare payload;
//! - agent fields at the root, or nested under `agent` or `self`;
//! - game fields (`status`, `currentTurn`) at the root or under `game`;
//! - the current region as `currentRegion`, or looked up in `regions`
//!   (a map keyed by region id, or a list of region objects);
//! - adjacency as a top-level `adjacentRegions` list, or as
//!   `currentRegion.adjacent`.
//!
//! Units and ground items are reported for the whole visible area and are
//! filtered down to the agent's own region here. Fields missing from
//! units fall back to hp 100, attack 10, defense 5; missing adjacent
//! terrain falls back to plains and a missing `explored` flag to `true`.

use molty_types::{
    AdjacentRegion, AgentId, AgentIdentity, Direction, GameStatus, GroundItem, Item,
    ItemCategory, ItemId, Location, RegionId, StateSnapshot, Terrain, Unit, UnitId, UnitKind,
    Vitals,
};
use serde_json::{Map, Value};

/// Default hit points assumed for a unit that does not report them.
const DEFAULT_UNIT_HP: u32 = 100;

/// Default attack assumed for a unit that does not report it.
const DEFAULT_UNIT_ATTACK: u32 = 10;

/// Default defense assumed for a unit that does not report it.
const DEFAULT_UNIT_DEFENSE: u32 = 5;

/// Why a state payload could not be normalised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// The payload (or its `data`) is not a JSON object.
    #[error("state payload is not an object")]
    NotAnObject,

    /// A required field is absent or has the wrong type.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
}

/// Strip the `{success, data}` envelope, if present.
///
/// A payload without `data` is returned as is.
pub fn unwrap_envelope(payload: &Value) -> &Value {
    match payload.get("data") {
        Some(data) if payload.get("success").is_some() => data,
        _ => payload,
    }
}

/// Build a snapshot from a state response in any supported shape.
pub fn snapshot_from_value(payload: &Value) -> Result<StateSnapshot, NormalizeError> {
    let root = unwrap_envelope(payload)
        .as_object()
        .ok_or(NormalizeError::NotAnObject)?;
    let agent = nested(root, &["agent", "self"]).unwrap_or(root);
    let game = nested(root, &["game"]).unwrap_or(root);

    let agent_id = string(agent, &["id", "agentId"]).ok_or(NormalizeError::MissingField("id"))?;
    let current_region = nested(root, &["currentRegion"]);
    let region_id = string(agent, &["regionId", "position"])
        .or_else(|| string(root, &["regionId"]))
        .or_else(|| current_region.and_then(|region| string(region, &["id"])))
        .ok_or(NormalizeError::MissingField("regionId"))?;
    let region = current_region.or_else(|| lookup_region(root, &region_id));

    let hp = uint(agent, &["hp"]).ok_or(NormalizeError::MissingField("hp"))?;
    let ep = uint(agent, &["ep"]).unwrap_or(0);
    let vitals = Vitals {
        hp,
        max_hp: uint(agent, &["maxHp"]).unwrap_or(hp),
        ep,
        max_ep: uint(agent, &["maxEp"]).unwrap_or(ep),
        attack: uint(agent, &["atk", "attack"]).unwrap_or(0),
        defense: uint(agent, &["def", "defense"]).unwrap_or(0),
        vision: uint(agent, &["vision"]).unwrap_or(0),
    };

    let adjacent = list(root, &["adjacentRegions"])
        .or_else(|| region.and_then(|r| list(r, &["adjacent", "adjacentRegions"])))
        .map(|slots| slots.iter().map(adjacent_region).collect())
        .unwrap_or_default();

    let location = Location {
        region_id: RegionId::new(region_id.clone()),
        is_death_zone: region
            .and_then(|r| boolean(r, &["isDeathZone"]))
            .unwrap_or(false),
        terrain: region
            .and_then(|r| string(r, &["terrain"]))
            .map(|tag| Terrain::from_tag(&tag)),
        adjacent,
    };

    let units = list(root, &["units"])
        .or_else(|| list(game, &["units"]))
        .map(|units| {
            units
                .iter()
                .filter_map(Value::as_object)
                .filter(|u| string(u, &["position", "regionId"]).as_deref() == Some(region_id.as_str()))
                .filter(|u| string(u, &["id"]).as_deref() != Some(agent_id.as_str()))
                .filter_map(unit)
                .collect()
        })
        .unwrap_or_default();

    let ground_items = list(root, &["items", "groundItems"])
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .filter(|i| string(i, &["regionId"]).as_deref() == Some(region_id.as_str()))
                .filter_map(ground_item)
                .collect()
        })
        .unwrap_or_default();

    let inventory = list(agent, &["inventory"])
        .map(|items| items.iter().filter_map(Value::as_object).filter_map(item).collect())
        .unwrap_or_default();

    let status = string(game, &["status"])
        .or_else(|| string(root, &["status"]))
        .map_or(GameStatus::Waiting, |tag| GameStatus::from_tag(&tag));

    Ok(StateSnapshot {
        agent: AgentIdentity {
            id: AgentId::new(agent_id),
            name: string(agent, &["name"]).unwrap_or_default(),
            is_alive: boolean(agent, &["isAlive"]).unwrap_or(true),
        },
        vitals,
        location,
        inventory,
        equipped_weapon: nested(agent, &["equippedWeapon"]).and_then(item),
        units,
        ground_items,
        kills: uint(agent, &["kills"])
            .or_else(|| uint(root, &["kills"]))
            .unwrap_or(0),
        status,
        turn: wide_uint(game, &["currentTurn", "turn"])
            .or_else(|| wide_uint(root, &["currentTurn", "turn"])),
    })
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

fn adjacent_region(slot: &Value) -> Option<AdjacentRegion> {
    let obj = slot.as_object()?;
    Some(AdjacentRegion {
        direction: Direction::new(string(obj, &["direction"])?),
        terrain: string(obj, &["terrain"]).map_or(Terrain::Plains, |tag| Terrain::from_tag(&tag)),
        explored: boolean(obj, &["explored"]).unwrap_or(true),
        is_death_zone: boolean(obj, &["isDeathZone"]).unwrap_or(false),
        region_id: string(obj, &["regionId", "id"]).map(RegionId::new),
    })
}

fn unit(obj: &Map<String, Value>) -> Option<Unit> {
    let hp = uint(obj, &["hp"]).unwrap_or(DEFAULT_UNIT_HP);
    Some(Unit {
        id: UnitId::new(string(obj, &["id"])?),
        kind: string(obj, &["type", "kind"]).map_or(UnitKind::Other, |tag| UnitKind::from_tag(&tag)),
        name: string(obj, &["name"]),
        hp,
        max_hp: uint(obj, &["maxHp"]).unwrap_or(hp),
        attack: uint(obj, &["atk", "attack"]).unwrap_or(DEFAULT_UNIT_ATTACK),
        defense: uint(obj, &["def", "defense"]).unwrap_or(DEFAULT_UNIT_DEFENSE),
    })
}

fn item(obj: &Map<String, Value>) -> Option<Item> {
    Some(Item {
        id: ItemId::new(string(obj, &["id"])?),
        type_id: string(obj, &["typeId"]),
        category: string(obj, &["category"])
            .map_or(ItemCategory::Other, |tag| ItemCategory::from_tag(&tag)),
        name: string(obj, &["name"]),
        quantity: uint(obj, &["quantity"]).unwrap_or(1),
        attack_bonus: uint(obj, &["atkBonus"]).unwrap_or(0),
        hp_restore: uint(obj, &["hpRestore"]).unwrap_or(0),
    })
}

fn ground_item(obj: &Map<String, Value>) -> Option<GroundItem> {
    Some(GroundItem {
        id: ItemId::new(string(obj, &["id"])?),
        name: string(obj, &["name"]),
        value: uint(obj, &["value"]).unwrap_or(0),
    })
}

fn lookup_region<'a>(root: &'a Map<String, Value>, region_id: &str) -> Option<&'a Map<String, Value>> {
    match root.get("regions")? {
        Value::Object(by_id) => by_id.get(region_id).and_then(Value::as_object),
        Value::Array(regions) => regions
            .iter()
            .filter_map(Value::as_object)
            .find(|r| string(r, &["id"]).as_deref() == Some(region_id)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

/// First key whose value is not `null`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn nested<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    field(obj, keys).and_then(Value::as_object)
}

fn list<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Vec<Value>> {
    field(obj, keys).and_then(Value::as_array)
}

/// Strings pass through; numeric ids are rendered.
fn string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match field(obj, keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn boolean(obj: &Map<String, Value>, keys: &[&str]) -> Option<bool> {
    field(obj, keys).and_then(Value::as_bool)
}

/// Non-negative integer saturated to `u32`; negatives read as zero.
fn uint(obj: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    wide_uint(obj, keys).map(|n| u32::try_from(n).unwrap_or(u32::MAX))
}

fn wide_uint(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    let value = field(obj, keys)?;
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    if value.as_i64().is_some() {
        return Some(0);
    }
    let f = value.as_f64()?;
    if !f.is_finite() {
        return None;
    }
    let floored = f.max(0.0).floor().min(9_007_199_254_740_992.0);
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    Some(floored as u64)
}
