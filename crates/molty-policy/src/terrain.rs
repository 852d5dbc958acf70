//! Static terrain desirability.
//!
//! The ordering favours vision and loot density over stealth:
//! hills > ruins > plains > forest > water, with unknown terrain just
//! above water.

use molty_types::{AdjacentRegion, Terrain};

/// Score added to a region the agent has not explored yet.
pub const UNEXPLORED_BONUS: u32 = 20;

/// Score for terrain tags this build does not recognise.
pub const UNKNOWN_TERRAIN_SCORE: u32 = 40;

/// Desirability of a terrain type.
pub const fn score(terrain: Terrain) -> u32 {
    match terrain {
        Terrain::Hills => 100,
        Terrain::Ruins => 85,
        Terrain::Plains => 70,
        Terrain::Forest => 50,
        Terrain::Water => 20,
        Terrain::Other => UNKNOWN_TERRAIN_SCORE,
    }
}

/// Movement score of an adjacent region: terrain plus the unexplored bonus.
pub const fn region_score(region: &AdjacentRegion) -> u32 {
    let base = score(region.terrain);
    if region.explored {
        base
    } else {
        base.saturating_add(UNEXPLORED_BONUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::adjacent;

    #[test]
    fn terrain_ordering() {
        assert!(score(Terrain::Hills) > score(Terrain::Ruins));
        assert!(score(Terrain::Ruins) > score(Terrain::Plains));
        assert!(score(Terrain::Plains) > score(Terrain::Forest));
        assert!(score(Terrain::Forest) > score(Terrain::Other));
        assert!(score(Terrain::Other) > score(Terrain::Water));
    }

    #[test]
    fn unexplored_bonus_applies() {
        let explored = adjacent("n", Terrain::Forest, true);
        let fresh = adjacent("s", Terrain::Forest, false);
        assert_eq!(region_score(&explored), 50);
        assert_eq!(region_score(&fresh), 70);
    }
}
