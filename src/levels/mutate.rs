//! Level mutation strategies
//!
//! Mutation grows the teacher's candidate pool over time: after an episode,
//! the teacher may derive a sibling or structurally-mutated variant of the
//! level it just trained on and admit it as a future candidate. The exact
//! mutation function is pluggable and depends on the level representation.
//!
//! Grid text mutations swap the roles of resource tiles within a layout:
//! `O` (onions), `D` (dishes), `S` (serving window), `P` (pots), plus the
//! two player start markers `1` and `2`.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use thiserror::Error;

/// Resource tiles eligible for role swaps
const ROLE_TILES: [char; 4] = ['O', 'D', 'S', 'P'];

/// Errors produced by level mutation
#[derive(Debug, Error)]
pub enum MutationError {
    /// The level lacks the structural elements the mutation requires
    #[error("invalid mutation request: {0}")]
    InvalidMutationRequest(String),

    /// No mutation candidate remains after exclusions
    #[error("no mutation candidates available for level '{0}'")]
    NoCandidates(String),

    /// The mutator has no representation for this level
    #[error("unknown level '{0}'")]
    UnknownLevel(String),
}

/// Pluggable mutation strategy
///
/// Given a source level and a set of identifiers to avoid (typically the
/// current buffer contents), produce a derived level identifier.
pub trait LevelMutator {
    /// Derive a new candidate level from `level`, avoiding `excluded` ids
    fn mutate(&mut self, level: &str, excluded: &[String]) -> Result<String, MutationError>;
}

/// Mutation by sibling selection
///
/// Picks a uniformly random different level from a fixed candidate list.
/// This is the simplest possible mutation over a closed vocabulary.
#[derive(Debug, Clone)]
pub struct SiblingMutator {
    candidates: Vec<String>,
}

impl SiblingMutator {
    /// Create a mutator over a fixed candidate list
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }
}

impl LevelMutator for SiblingMutator {
    fn mutate(&mut self, level: &str, excluded: &[String]) -> Result<String, MutationError> {
        let mut rng = rand::thread_rng();
        let options: Vec<&String> = self
            .candidates
            .iter()
            .filter(|c| c.as_str() != level && !excluded.contains(c))
            .collect();
        options
            .choose(&mut rng)
            .map(|s| (*s).clone())
            .ok_or_else(|| MutationError::NoCandidates(level.to_string()))
    }
}

/// Swap every occurrence of two tile characters in a grid layout
///
/// Both characters must name valid resource tiles and both must be present
/// in the grid; otherwise the swap would silently produce an unchanged or
/// unsolvable layout.
pub fn swap_tiles(grid: &str, a: char, b: char) -> Result<String, MutationError> {
    if !ROLE_TILES.contains(&a) || !ROLE_TILES.contains(&b) {
        return Err(MutationError::InvalidMutationRequest(format!(
            "'{a}' and '{b}' must both be resource tiles ({ROLE_TILES:?})"
        )));
    }
    if a == b {
        return Err(MutationError::InvalidMutationRequest(format!(
            "cannot swap tile '{a}' with itself"
        )));
    }
    if !grid.contains(a) || !grid.contains(b) {
        return Err(MutationError::InvalidMutationRequest(format!(
            "grid is missing tile '{a}' or '{b}'"
        )));
    }
    Ok(swap_chars(grid, a, b))
}

/// Swap the two player start markers (`1` and `2`) in a grid layout
///
/// For asymmetric layouts this exchanges the players' structural roles.
pub fn swap_player_starts(grid: &str) -> Result<String, MutationError> {
    if !grid.contains('1') || !grid.contains('2') {
        return Err(MutationError::InvalidMutationRequest(
            "grid is missing a player start marker".to_string(),
        ));
    }
    Ok(swap_chars(grid, '1', '2'))
}

fn swap_chars(grid: &str, a: char, b: char) -> String {
    grid.chars()
        .map(|c| {
            if c == a {
                b
            } else if c == b {
                a
            } else {
                c
            }
        })
        .collect()
}

/// Structural mutation over grid text layouts
///
/// Holds the grid text for each known level. A mutation picks one of the
/// applicable swaps (a resource-tile pair present in the grid, or the two
/// player starts), derives a new identifier such as `cramped_room-swap-OD`,
/// and caches the derived grid so the variant can itself be mutated later.
pub struct GridSwapMutator {
    grids: HashMap<String, String>,
}

impl GridSwapMutator {
    /// Create a mutator over a map of level id to grid text
    pub fn new(grids: HashMap<String, String>) -> Self {
        Self { grids }
    }

    /// Grid text for a level, including derived variants
    pub fn grid(&self, level: &str) -> Option<&str> {
        self.grids.get(level).map(|s| s.as_str())
    }

    /// Enumerate the swaps applicable to a grid
    fn applicable_swaps(grid: &str) -> Vec<(char, char)> {
        let mut swaps = Vec::new();
        for (i, &a) in ROLE_TILES.iter().enumerate() {
            for &b in &ROLE_TILES[i + 1..] {
                if grid.contains(a) && grid.contains(b) {
                    swaps.push((a, b));
                }
            }
        }
        if grid.contains('1') && grid.contains('2') {
            swaps.push(('1', '2'));
        }
        swaps
    }
}

impl LevelMutator for GridSwapMutator {
    fn mutate(&mut self, level: &str, excluded: &[String]) -> Result<String, MutationError> {
        let grid = self
            .grids
            .get(level)
            .ok_or_else(|| MutationError::UnknownLevel(level.to_string()))?
            .clone();

        let swaps = Self::applicable_swaps(&grid);
        if swaps.is_empty() {
            return Err(MutationError::InvalidMutationRequest(format!(
                "level '{level}' has no swappable tile pair"
            )));
        }

        let options: Vec<((char, char), String)> = swaps
            .into_iter()
            .map(|(a, b)| {
                let id = if (a, b) == ('1', '2') {
                    format!("{level}-swap-players")
                } else {
                    format!("{level}-swap-{a}{b}")
                };
                ((a, b), id)
            })
            .filter(|(_, id)| !excluded.contains(id))
            .collect();

        let mut rng = rand::thread_rng();
        let ((a, b), derived_id) = options
            .choose(&mut rng)
            .cloned()
            .ok_or_else(|| MutationError::NoCandidates(level.to_string()))?;

        let derived_grid = swap_chars(&grid, a, b);
        self.grids.insert(derived_id.clone(), derived_grid);
        Ok(derived_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: &str = "XXPXX\nO 1 S\nX 2 X\nXXDXX";

    #[test]
    fn test_swap_tiles_basic() {
        let swapped = swap_tiles(GRID, 'O', 'D').unwrap();
        assert_eq!(swapped, "XXPXX\nD 1 S\nX 2 X\nXXOXX");
    }

    #[test]
    fn test_swap_tiles_is_involution() {
        let once = swap_tiles(GRID, 'S', 'P').unwrap();
        let twice = swap_tiles(&once, 'S', 'P').unwrap();
        assert_eq!(twice, GRID);
    }

    #[test]
    fn test_swap_tiles_missing_tile_fails() {
        let grid = "XXXXX\nO 1 S\nXXXXX"; // no D or P
        let err = swap_tiles(grid, 'O', 'D').unwrap_err();
        assert!(matches!(err, MutationError::InvalidMutationRequest(_)));
    }

    #[test]
    fn test_swap_tiles_rejects_non_resource_chars() {
        let err = swap_tiles(GRID, 'X', 'O').unwrap_err();
        assert!(matches!(err, MutationError::InvalidMutationRequest(_)));
    }

    #[test]
    fn test_swap_player_starts() {
        let swapped = swap_player_starts(GRID).unwrap();
        assert_eq!(swapped, "XXPXX\nO 2 S\nX 1 X\nXXDXX");
    }

    #[test]
    fn test_swap_player_starts_missing_marker_fails() {
        let err = swap_player_starts("XXPXX\nO 1 S").unwrap_err();
        assert!(matches!(err, MutationError::InvalidMutationRequest(_)));
    }

    #[test]
    fn test_sibling_mutator_avoids_source_and_excluded() {
        let mut mutator = SiblingMutator::new(vec!["a".into(), "b".into(), "c".into()]);
        for _ in 0..20 {
            let derived = mutator.mutate("a", &["b".to_string()]).unwrap();
            assert_eq!(derived, "c");
        }
    }

    #[test]
    fn test_sibling_mutator_exhausted() {
        let mut mutator = SiblingMutator::new(vec!["a".into()]);
        let err = mutator.mutate("a", &[]).unwrap_err();
        assert!(matches!(err, MutationError::NoCandidates(_)));
    }

    #[test]
    fn test_grid_swap_mutator_derives_and_caches() {
        let mut grids = HashMap::new();
        grids.insert("base".to_string(), GRID.to_string());
        let mut mutator = GridSwapMutator::new(grids);

        let derived = mutator.mutate("base", &[]).unwrap();
        assert!(derived.starts_with("base-swap-"));
        // Derived grid is cached and can be mutated again
        assert!(mutator.grid(&derived).is_some());
        assert!(mutator.mutate(&derived, &[]).is_ok());
    }

    #[test]
    fn test_grid_swap_mutator_unknown_level() {
        let mut mutator = GridSwapMutator::new(HashMap::new());
        let err = mutator.mutate("missing", &[]).unwrap_err();
        assert!(matches!(err, MutationError::UnknownLevel(_)));
    }

    #[test]
    fn test_grid_swap_mutator_no_swappable_tiles() {
        let mut grids = HashMap::new();
        grids.insert("bare".to_string(), "XXXX\nX  X\nXXXX".to_string());
        let mut mutator = GridSwapMutator::new(grids);
        let err = mutator.mutate("bare", &[]).unwrap_err();
        assert!(matches!(err, MutationError::InvalidMutationRequest(_)));
    }
}
