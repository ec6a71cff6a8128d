//! Shelf module - bounded LIFO stacks of boxes
//!
//! `boxes[0]` is the bottom of the shelf and `boxes.last()` is the top. Only
//! the top box can move. Mutation is crate-private so the capacity bound and
//! the "top is always visible" rule can only be changed through the rules in
//! [`crate::rules`] and [`crate::session`].

use std::ops::Range;

use crate::types::Color;

/// A box on a shelf during play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxData {
    /// Unique within one `RuntimeLevel`, assigned in shelf/slot order
    pub id: u32,
    pub color: Color,
    pub color_visible: bool,
    pub has_goal: bool,
}

/// A capacity-bounded stack of boxes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfData {
    capacity: usize,
    boxes: Vec<BoxData>,
}

impl ShelfData {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            boxes: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.boxes.len() >= self.capacity
    }

    /// Boxes bottom to top
    pub fn boxes(&self) -> &[BoxData] {
        &self.boxes
    }

    pub fn top(&self) -> Option<&BoxData> {
        self.boxes.last()
    }

    pub fn top_color(&self) -> Option<Color> {
        self.boxes.last().map(|b| b.color)
    }

    pub fn has_goal(&self) -> bool {
        self.boxes.iter().any(|b| b.has_goal)
    }

    pub fn hidden_count(&self) -> usize {
        self.boxes.iter().filter(|b| !b.color_visible).count()
    }

    /// Length of the same-color run ending at the top
    pub fn top_run_len(&self) -> usize {
        let Some(top) = self.top_color() else {
            return 0;
        };
        self.boxes
            .iter()
            .rev()
            .take_while(|b| b.color == top)
            .count()
    }

    /// First maximal same-color run of at least `min_len`, scanning bottom up
    pub fn find_run(&self, min_len: usize) -> Option<Range<usize>> {
        let mut start = 0;
        while start < self.boxes.len() {
            let color = self.boxes[start].color;
            let mut end = start + 1;
            while end < self.boxes.len() && self.boxes[end].color == color {
                end += 1;
            }
            if end - start >= min_len {
                return Some(start..end);
            }
            start = end;
        }
        None
    }

    /// Push onto the top; refuses when full
    pub(crate) fn push(&mut self, b: BoxData) -> bool {
        if self.is_full() {
            return false;
        }
        self.boxes.push(b);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<BoxData> {
        self.boxes.pop()
    }

    /// Remove a run; boxes above it drop down
    pub(crate) fn remove_range(&mut self, range: Range<usize>) -> Vec<BoxData> {
        self.boxes.drain(range).collect()
    }

    pub(crate) fn reveal_top(&mut self) {
        if let Some(top) = self.boxes.last_mut() {
            top.color_visible = true;
        }
    }

    /// Reveal every box; returns how many were hidden
    pub(crate) fn reveal_all(&mut self) -> usize {
        let mut revealed = 0;
        for b in &mut self.boxes {
            if !b.color_visible {
                b.color_visible = true;
                revealed += 1;
            }
        }
        revealed
    }

    pub(crate) fn boxes_mut(&mut self) -> &mut [BoxData] {
        &mut self.boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelf(colors: &[Color], capacity: usize) -> ShelfData {
        let mut s = ShelfData::new(capacity);
        for (i, &color) in colors.iter().enumerate() {
            assert!(s.push(BoxData {
                id: i as u32 + 1,
                color,
                color_visible: false,
                has_goal: false,
            }));
        }
        s
    }

    #[test]
    fn push_refuses_when_full() {
        let mut s = shelf(&[Color::Red, Color::Blue], 2);
        assert!(s.is_full());
        let extra = BoxData {
            id: 9,
            color: Color::Red,
            color_visible: true,
            has_goal: false,
        };
        assert!(!s.push(extra));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn top_run_counts_matching_suffix() {
        let s = shelf(&[Color::Blue, Color::Red, Color::Red], 4);
        assert_eq!(s.top_run_len(), 2);
        assert_eq!(ShelfData::new(3).top_run_len(), 0);
    }

    #[test]
    fn find_run_scans_from_bottom() {
        let s = shelf(
            &[Color::Red, Color::Red, Color::Red, Color::Blue, Color::Blue],
            6,
        );
        assert_eq!(s.find_run(3), Some(0..3));
        assert_eq!(s.find_run(4), None);
    }

    #[test]
    fn find_run_reports_maximal_run() {
        let s = shelf(
            &[Color::Blue, Color::Green, Color::Green, Color::Green, Color::Green],
            6,
        );
        assert_eq!(s.find_run(3), Some(1..5));
    }

    #[test]
    fn remove_range_drops_boxes_above() {
        let mut s = shelf(&[Color::Blue, Color::Red, Color::Red, Color::Red, Color::Green], 6);
        let removed = s.remove_range(1..4);
        assert_eq!(removed.len(), 3);
        let colors: Vec<Color> = s.boxes().iter().map(|b| b.color).collect();
        assert_eq!(colors, vec![Color::Blue, Color::Green]);
    }

    #[test]
    fn reveal_all_counts_hidden() {
        let mut s = shelf(&[Color::Blue, Color::Red, Color::Green], 3);
        s.reveal_top();
        assert_eq!(s.hidden_count(), 2);
        assert_eq!(s.reveal_all(), 2);
        assert_eq!(s.hidden_count(), 0);
    }
}
