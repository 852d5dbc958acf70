//! Death zone avoidance.
//!
//! The server marks shrinking-map regions with an explicit flag; nothing
//! here infers hazard from terrain or turn count.

use molty_types::{AdjacentRegion, Direction, Location};

/// Whether the agent's current region is a death zone.
pub const fn is_death_zone(location: &Location) -> bool {
    location.is_death_zone
}

/// Whether an adjacent region is a death zone.
pub const fn is_death_zone_region(region: &AdjacentRegion) -> bool {
    region.is_death_zone
}

/// First direction leading out of a death zone into a safe region.
///
/// Returns `None` when the current region is safe, or when every
/// enterable neighbour is a death zone too.
pub fn find_safe_direction(location: &Location) -> Option<&Direction> {
    if !is_death_zone(location) {
        return None;
    }
    location
        .adjacent
        .iter()
        .flatten()
        .find(|region| !is_death_zone_region(region))
        .map(|region| &region.direction)
}
