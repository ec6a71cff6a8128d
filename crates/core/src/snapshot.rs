use crate::level::RuntimeLevel;
use crate::shelf::{BoxData, ShelfData};
use crate::types::{Color, GameState, ToolKind, TOOL_KIND_COUNT};

/// What the player may see of one box; `color` is `None` while hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxView {
    pub id: u32,
    pub color: Option<Color>,
}

impl From<&BoxData> for BoxView {
    fn from(value: &BoxData) -> Self {
        Self {
            id: value.id,
            color: value.color_visible.then_some(value.color),
        }
    }
}

impl BoxView {
    pub fn visible(&self) -> bool {
        self.color.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShelfView {
    pub capacity: usize,
    /// Bottom to top
    pub boxes: Vec<BoxView>,
    pub is_hint_shelf: bool,
}

impl ShelfView {
    pub fn from_shelf(shelf: &ShelfData, is_hint_shelf: bool) -> Self {
        Self {
            capacity: shelf.capacity(),
            boxes: shelf.boxes().iter().map(BoxView::from).collect(),
            is_hint_shelf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub state: GameState,
    pub shelves: Vec<ShelfView>,
    pub tools: [(ToolKind, u32); TOOL_KIND_COUNT],
    pub last_hint: Option<usize>,
    pub score: u32,
    pub total_points: u64,
    pub undo_depth: usize,
    pub ad_bonus_remaining: u32,
}

impl SessionSnapshot {
    pub fn shelves_of(level: Option<&RuntimeLevel>, last_hint: Option<usize>) -> Vec<ShelfView> {
        level
            .map(|l| {
                l.shelves()
                    .iter()
                    .enumerate()
                    .map(|(i, s)| ShelfView::from_shelf(s, last_hint == Some(i)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn tool_count(&self, kind: ToolKind) -> u32 {
        self.tools
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn playable(&self) -> bool {
        self.state == GameState::Playing
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            state: GameState::Idle,
            shelves: Vec::new(),
            tools: ToolKind::ALL.map(|k| (k, 0)),
            last_hint: None,
            score: 0,
            total_points: 0,
            undo_depth: 0,
            ad_bonus_remaining: 0,
        }
    }
}
