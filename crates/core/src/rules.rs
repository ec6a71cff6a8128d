//! Rules module - move legality and elimination
//!
//! A move takes the top box of one shelf and puts it on another. It is legal
//! when the shelves differ, the source has a visible top, the destination has
//! room, and the destination is empty or shows the same color on top.
//!
//! After every move [`resolve_eliminations`] runs to a fixpoint: the first
//! same-color run of [`MIN_RUN_LEN`] or more (shelves in order, each scanned
//! bottom up) is removed, the shelf's new top is revealed, and the scan
//! restarts from the first shelf. Every pass removes at least three boxes, so
//! the loop ends after at most `total_boxes / 3` removals.

use thiserror::Error;

use crate::level::RuntimeLevel;
use crate::types::{Color, MIN_RUN_LEN, POINTS_PER_CLEARED_BOX};

/// A candidate move between two shelves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no level is being played")]
    NotPlaying,
    #[error("shelf {index} does not exist")]
    InvalidShelf { index: usize },
    #[error("source and destination are the same shelf")]
    SameShelf,
    #[error("source shelf is empty")]
    SourceEmpty,
    #[error("destination shelf is full")]
    DestinationFull,
    #[error("top box of the source shelf is hidden")]
    TopHidden,
    #[error("cannot place {moving:?} on {target:?}")]
    ColorMismatch { moving: Color, target: Color },
}

impl MoveError {
    pub fn code(&self) -> &'static str {
        match self {
            MoveError::NotPlaying => "not_playing",
            MoveError::InvalidShelf { .. } | MoveError::SameShelf => "invalid_shelf",
            MoveError::SourceEmpty
            | MoveError::DestinationFull
            | MoveError::TopHidden
            | MoveError::ColorMismatch { .. } => "illegal_move",
        }
    }
}

/// One run removed by elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedRun {
    pub shelf: usize,
    pub color: Color,
    pub len: usize,
    pub had_goal: bool,
}

/// Everything removed by one call to [`resolve_eliminations`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elimination {
    pub runs: Vec<ClearedRun>,
    pub score: u32,
    pub goal_found: bool,
}

impl Elimination {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn boxes_cleared(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }
}

/// Result of a successful move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub mv: Move,
    pub box_id: u32,
    pub elimination: Elimination,
}

/// Check a move without applying it
pub fn check_move(level: &RuntimeLevel, from: usize, to: usize) -> Result<(), MoveError> {
    let shelves = level.shelves();
    let src = shelves
        .get(from)
        .ok_or(MoveError::InvalidShelf { index: from })?;
    let dst = shelves.get(to).ok_or(MoveError::InvalidShelf { index: to })?;
    if from == to {
        return Err(MoveError::SameShelf);
    }
    let Some(moving) = src.top() else {
        return Err(MoveError::SourceEmpty);
    };
    if dst.is_full() {
        return Err(MoveError::DestinationFull);
    }
    if !moving.color_visible {
        return Err(MoveError::TopHidden);
    }
    if let Some(target) = dst.top_color() {
        if target != moving.color {
            return Err(MoveError::ColorMismatch {
                moving: moving.color,
                target,
            });
        }
    }
    Ok(())
}

pub fn is_valid_move(level: &RuntimeLevel, from: usize, to: usize) -> bool {
    check_move(level, from, to).is_ok()
}

/// Every legal move, ordered by source then destination
pub fn valid_moves(level: &RuntimeLevel) -> Vec<Move> {
    let n = level.shelf_count();
    let mut out = Vec::new();
    for from in 0..n {
        for to in 0..n {
            if from != to && is_valid_move(level, from, to) {
                out.push(Move { from, to });
            }
        }
    }
    out
}

pub fn has_valid_move(level: &RuntimeLevel) -> bool {
    let n = level.shelf_count();
    (0..n).any(|from| (0..n).any(|to| from != to && is_valid_move(level, from, to)))
}

/// Length of the destination's top run once the moving box lands
///
/// Assumes `mv` is legal. A result of [`MIN_RUN_LEN`] or more means the move
/// eliminates immediately.
pub fn predicted_run_len(level: &RuntimeLevel, mv: Move) -> usize {
    level
        .shelf(mv.to)
        .map(|dst| dst.top_run_len() + 1)
        .unwrap_or(0)
}

/// Apply a legal move and resolve eliminations
pub fn apply_move(
    level: &mut RuntimeLevel,
    from: usize,
    to: usize,
) -> Result<AppliedMove, MoveError> {
    check_move(level, from, to)?;
    let box_id = transfer_top(level, from, to).ok_or(MoveError::SourceEmpty)?;
    let elimination = resolve_eliminations(level);
    Ok(AppliedMove {
        mv: Move { from, to },
        box_id,
        elimination,
    })
}

/// Move the top box without rule checks; reveals both new tops
///
/// Returns the moved box id, or `None` (leaving state untouched) when the
/// source is empty or the destination is full.
pub(crate) fn transfer_top(level: &mut RuntimeLevel, from: usize, to: usize) -> Option<u32> {
    let shelves = level.shelves_mut();
    if from >= shelves.len() || to >= shelves.len() || shelves[to].is_full() {
        return None;
    }
    let moving = shelves[from].pop()?;
    let id = moving.id;
    shelves[to].push(moving);
    shelves[from].reveal_top();
    shelves[to].reveal_top();
    Some(id)
}

/// Remove runs until none of length [`MIN_RUN_LEN`] or more remain
///
/// Calling this on a level without qualifying runs changes nothing.
pub fn resolve_eliminations(level: &mut RuntimeLevel) -> Elimination {
    let mut out = Elimination::default();
    loop {
        let found = level
            .shelves()
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.find_run(MIN_RUN_LEN).map(|r| (i, r)));
        let Some((shelf, range)) = found else {
            break;
        };

        let removed = level.shelves_mut()[shelf].remove_range(range);
        level.shelves_mut()[shelf].reveal_top();

        let len = removed.len();
        let had_goal = removed.iter().any(|b| b.has_goal);
        let points = POINTS_PER_CLEARED_BOX * len as u32;
        level.add_score(points);
        if had_goal {
            level.mark_goal_found();
            out.goal_found = true;
        }
        out.score += points;
        out.runs.push(ClearedRun {
            shelf,
            color: removed[0].color,
            len,
            had_goal,
        });
    }
    out
}
