//! Runtime level - the mutable shelf/box state of one play attempt
//!
//! A [`RuntimeLevel`] is built fresh from a [`LevelDefinition`] for every
//! attempt or simulated playout and is never reused. Box ids are assigned in
//! shelf/slot order starting from 1.

use thiserror::Error;

use crate::rng::SimpleRng;
use crate::shelf::{BoxData, ShelfData};
use crate::types::{
    Color, DefinitionError, GoalPlacement, LevelDefinition, COLOR_COUNT, DEFAULT_SHELF_CAPACITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("invalid level definition: {0}")]
    Definition(#[from] DefinitionError),
    #[error("level has no boxes to hold the goal")]
    NoBoxes,
    #[error("goal shelf {shelf} does not exist")]
    InvalidGoalShelf { shelf: usize },
    #[error("goal depth {depth} is out of range for shelf {shelf} holding {len} boxes")]
    InvalidGoalDepth {
        shelf: usize,
        depth: usize,
        len: usize,
    },
    #[error("goal already placed")]
    GoalAlreadyPlaced,
}

impl LevelError {
    pub fn code(&self) -> &'static str {
        match self {
            LevelError::Definition(_) => "invalid_definition",
            LevelError::NoBoxes => "no_boxes",
            LevelError::InvalidGoalShelf { .. } | LevelError::InvalidGoalDepth { .. } => {
                "invalid_goal_placement"
            }
            LevelError::GoalAlreadyPlaced => "goal_already_placed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLevel {
    shelves: Vec<ShelfData>,
    reward_score: u32,
    ad_bonus_remaining: u32,
    goal_found: bool,
    score: u32,
}

impl RuntimeLevel {
    /// Build the runtime shelves for one attempt
    ///
    /// A box starts visible when the level does not hide boxes or its slot is
    /// authored visible; the top of every shelf is then forced visible.
    pub fn build(def: &LevelDefinition) -> Result<Self, LevelError> {
        let mut shelves = Vec::with_capacity(def.shelves.len() + def.extra_empty_shelves);
        let mut next_id: u32 = 1;

        for (index, shelf_def) in def.shelves.iter().enumerate() {
            if shelf_def.capacity == 0 {
                return Err(DefinitionError::ZeroCapacity { shelf: index }.into());
            }
            if shelf_def.boxes.len() > shelf_def.capacity {
                return Err(DefinitionError::OverCapacity {
                    shelf: index,
                    boxes: shelf_def.boxes.len(),
                    capacity: shelf_def.capacity,
                }
                .into());
            }

            let mut shelf = ShelfData::new(shelf_def.capacity);
            for slot in &shelf_def.boxes {
                shelf.push(BoxData {
                    id: next_id,
                    color: slot.color,
                    color_visible: !def.only_top_visible || slot.start_visible,
                    has_goal: false,
                });
                next_id += 1;
            }
            shelf.reveal_top();
            shelves.push(shelf);
        }

        let extra_capacity = def
            .shelves
            .first()
            .map(|s| s.capacity)
            .unwrap_or(DEFAULT_SHELF_CAPACITY);
        for _ in 0..def.extra_empty_shelves {
            shelves.push(ShelfData::new(extra_capacity));
        }

        Ok(Self {
            shelves,
            reward_score: def.reward_score,
            ad_bonus_remaining: 0,
            goal_found: false,
            score: 0,
        })
    }

    pub fn with_ad_bonus(mut self, uses: u32) -> Self {
        self.ad_bonus_remaining = uses;
        self
    }

    /// Mark one box as the goal; returns its id
    pub fn place_goal(
        &mut self,
        placement: GoalPlacement,
        rng: &mut SimpleRng,
    ) -> Result<u32, LevelError> {
        if self.goal_box_id().is_some() {
            return Err(LevelError::GoalAlreadyPlaced);
        }
        let total = self.total_boxes();
        if total == 0 {
            return Err(LevelError::NoBoxes);
        }

        let (shelf, slot) = match placement {
            GoalPlacement::Random => {
                let mut pick = rng.next_range(total);
                let mut found = None;
                for (i, s) in self.shelves.iter().enumerate() {
                    if pick < s.len() {
                        found = Some((i, pick));
                        break;
                    }
                    pick -= s.len();
                }
                found.ok_or(LevelError::NoBoxes)?
            }
            GoalPlacement::At { shelf, depth } => {
                let s = self
                    .shelves
                    .get(shelf)
                    .ok_or(LevelError::InvalidGoalShelf { shelf })?;
                if depth >= s.len() {
                    return Err(LevelError::InvalidGoalDepth {
                        shelf,
                        depth,
                        len: s.len(),
                    });
                }
                (shelf, s.len() - 1 - depth)
            }
        };

        let b = &mut self.shelves[shelf].boxes_mut()[slot];
        b.has_goal = true;
        Ok(b.id)
    }

    pub fn shelves(&self) -> &[ShelfData] {
        &self.shelves
    }

    pub fn shelf(&self, index: usize) -> Option<&ShelfData> {
        self.shelves.get(index)
    }

    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    pub fn reward_score(&self) -> u32 {
        self.reward_score
    }

    pub fn ad_bonus_remaining(&self) -> u32 {
        self.ad_bonus_remaining
    }

    pub fn goal_found(&self) -> bool {
        self.goal_found
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_boxes(&self) -> usize {
        self.shelves.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shelves.iter().all(|s| s.is_empty())
    }

    /// Shelf currently holding the goal box
    pub fn goal_shelf(&self) -> Option<usize> {
        self.shelves.iter().position(|s| s.has_goal())
    }

    pub fn goal_box_id(&self) -> Option<u32> {
        self.shelves
            .iter()
            .flat_map(|s| s.boxes())
            .find(|b| b.has_goal)
            .map(|b| b.id)
    }

    /// Boxes per color still on the board
    pub fn color_counts(&self) -> [usize; COLOR_COUNT] {
        let mut counts = [0usize; COLOR_COUNT];
        for b in self.shelves.iter().flat_map(|s| s.boxes()) {
            counts[b.color.index()] += 1;
        }
        counts
    }

    /// True once no color has enough boxes left to form a run of `min_run`
    pub fn is_cleared(&self, min_run: usize) -> bool {
        self.color_counts().iter().all(|&n| n < min_run)
    }

    /// Colors bottom to top for each shelf (ignores visibility)
    pub fn color_layout(&self) -> Vec<Vec<Color>> {
        self.shelves
            .iter()
            .map(|s| s.boxes().iter().map(|b| b.color).collect())
            .collect()
    }

    pub(crate) fn shelves_mut(&mut self) -> &mut [ShelfData] {
        &mut self.shelves
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) fn mark_goal_found(&mut self) {
        self.goal_found = true;
    }

    pub(crate) fn spend_ad_bonus(&mut self) -> bool {
        if self.ad_bonus_remaining == 0 {
            return false;
        }
        self.ad_bonus_remaining -= 1;
        true
    }
}
