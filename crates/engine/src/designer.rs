//! Turn a layout and an occlusion plan into a playable level definition

use thiserror::Error;

use cat_shelf_core::SimpleRng;
use cat_shelf_types::{BoxSlot, LayoutRequest, LevelDefinition, ShelfDefinition};

use crate::layout::{GenerationError, Layout, LayoutGenerator, LayoutParams};
use crate::occlusion::{OcclusionAllocator, OcclusionError, OcclusionPlan};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error("shelf capacity {capacity} is below {max_boxes} boxes per shelf")]
    CapacityTooSmall { capacity: usize, max_boxes: usize },
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Occlusion(#[from] OcclusionError),
}

impl DesignError {
    pub fn code(&self) -> &'static str {
        match self {
            DesignError::CapacityTooSmall { .. } => "infeasible",
            DesignError::Generation(e) => e.code(),
            DesignError::Occlusion(e) => e.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignedLevel {
    pub definition: LevelDefinition,
    pub layout: Layout,
    pub occlusion: OcclusionPlan,
}

impl From<&LayoutRequest> for LayoutParams {
    fn from(request: &LayoutRequest) -> Self {
        Self {
            total_shelf_count: request.total_shelf_count,
            empty_shelf_count: request.empty_shelf_count,
            total_box_count: request.total_box_count,
            max_boxes_per_shelf: request.max_boxes_per_shelf,
        }
    }
}

/// Generate a layout, hide boxes from the bottom up, and package the result
///
/// Capacity and hidden fraction are checked before anything is drawn from `rng`.
pub fn design_level(
    generator: &LayoutGenerator,
    request: &LayoutRequest,
    rng: &mut SimpleRng,
) -> Result<DesignedLevel, DesignError> {
    if request.shelf_capacity == 0 || request.shelf_capacity < request.max_boxes_per_shelf {
        return Err(DesignError::CapacityTooSmall {
            capacity: request.shelf_capacity,
            max_boxes: request.max_boxes_per_shelf,
        });
    }
    let allocator = OcclusionAllocator::new(request.hidden_fraction)?;
    let layout = generator.generate(&LayoutParams::from(request), rng)?;
    let occlusion = allocator.allocate(&layout.box_counts, rng);

    let shelves = layout
        .colors
        .iter()
        .zip(&occlusion.hidden)
        .map(|(colors, &hidden)| ShelfDefinition {
            capacity: request.shelf_capacity,
            boxes: colors
                .iter()
                .enumerate()
                .map(|(slot, &c)| {
                    if slot < hidden {
                        BoxSlot::hidden(c)
                    } else {
                        BoxSlot::visible(c)
                    }
                })
                .collect(),
        })
        .collect();

    let definition = LevelDefinition {
        difficulty_rating: request.difficulty_rating,
        reward_score: request.reward_score,
        only_top_visible: occlusion.allocated > 0,
        extra_empty_shelves: request.extra_empty_shelves,
        shelves,
    };

    Ok(DesignedLevel {
        definition,
        layout,
        occlusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cat_shelf_core::RuntimeLevel;
    use cat_shelf_types::{Color, GROUP_SIZE};

    fn generator() -> LayoutGenerator {
        LayoutGenerator::new(&Color::ALL[..6], GROUP_SIZE, 500)
    }

    #[test]
    fn default_request_designs_a_valid_level() {
        let designed = design_level(
            &generator(),
            &LayoutRequest::default(),
            &mut SimpleRng::new(2024),
        )
        .unwrap();
        let def = &designed.definition;
        assert_eq!(def.shelves.len(), 8);
        assert_eq!(def.total_boxes(), 32);
        assert!(!def.only_top_visible);
        assert_eq!(def.validate(GROUP_SIZE), Ok(()));

        let level = RuntimeLevel::build(def).unwrap();
        assert_eq!(level.shelf_count(), 8 + 2);
    }

    #[test]
    fn hidden_boxes_sit_at_the_bottom() {
        let request = LayoutRequest {
            hidden_fraction: 0.5,
            ..Default::default()
        };
        let designed = design_level(&generator(), &request, &mut SimpleRng::new(6)).unwrap();
        assert!(designed.definition.only_top_visible);
        assert_eq!(designed.occlusion.allocated, 16);

        for (shelf, &hidden) in designed.definition.shelves.iter().zip(&designed.occlusion.hidden) {
            let flags: Vec<bool> = shelf.boxes.iter().map(|b| b.start_visible).collect();
            let first_visible = flags.iter().position(|&v| v).unwrap_or(flags.len());
            assert_eq!(first_visible, hidden);
            assert!(flags[hidden..].iter().all(|&v| v));
            assert!(flags.last().copied().unwrap_or(true));
        }
    }

    #[test]
    fn rejects_small_capacity_before_generating() {
        let request = LayoutRequest {
            shelf_capacity: 3,
            ..Default::default()
        };
        let mut rng = SimpleRng::new(1);
        let before = rng.state();
        let err = design_level(&generator(), &request, &mut rng).unwrap_err();
        assert_eq!(err.code(), "infeasible");
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn rejects_bad_fraction() {
        let request = LayoutRequest {
            hidden_fraction: 2.0,
            ..Default::default()
        };
        let err = design_level(&generator(), &request, &mut SimpleRng::new(1)).unwrap_err();
        assert!(matches!(err, DesignError::Occlusion(_)));
    }
}
