//! Occlusion allocation - how many boxes start hidden on each shelf
//!
//! The top box of a shelf can never be hidden, so a shelf of `n` boxes holds
//! at most `n - 1` hidden ones. Hidden slots are spread one at a time onto a
//! shelf with the fewest so far.

use thiserror::Error;

use cat_shelf_core::SimpleRng;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OcclusionError {
    #[error("hidden fraction {0} is outside [0, 1]")]
    InvalidFraction(f64),
}

impl OcclusionError {
    pub fn code(&self) -> &'static str {
        match self {
            OcclusionError::InvalidFraction(_) => "invalid_fraction",
        }
    }
}

/// Per-shelf hidden counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcclusionPlan {
    pub hidden: Vec<usize>,
    /// `round(fraction * total_boxes)` before clamping
    pub requested: usize,
    /// What was actually allocated
    pub allocated: usize,
}

impl OcclusionPlan {
    /// The requested target did not fit under the per-shelf caps
    pub fn adjusted(&self) -> bool {
        self.requested != self.allocated
    }

    pub fn total_hidden(&self) -> usize {
        self.hidden.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionAllocator {
    fraction: f64,
}

impl OcclusionAllocator {
    pub fn new(fraction: f64) -> Result<Self, OcclusionError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(OcclusionError::InvalidFraction(fraction));
        }
        Ok(Self { fraction })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn allocate(&self, box_counts: &[usize], rng: &mut SimpleRng) -> OcclusionPlan {
        let caps: Vec<usize> = box_counts.iter().map(|&n| n.saturating_sub(1)).collect();
        let total: usize = box_counts.iter().sum();
        let requested = (self.fraction * total as f64).round() as usize;
        let target = requested.min(caps.iter().sum());

        let mut hidden = vec![0usize; box_counts.len()];
        let mut ties: Vec<usize> = Vec::with_capacity(box_counts.len());
        for _ in 0..target {
            let Some(fewest) = (0..hidden.len())
                .filter(|&i| hidden[i] < caps[i])
                .map(|i| hidden[i])
                .min()
            else {
                break;
            };
            ties.clear();
            ties.extend((0..hidden.len()).filter(|&i| hidden[i] == fewest && hidden[i] < caps[i]));
            if let Some(&i) = rng.choose(&ties) {
                hidden[i] += 1;
            }
        }

        let allocated = hidden.iter().sum();
        OcclusionPlan {
            hidden,
            requested,
            allocated,
        }
    }
}
