//! Layout generation - which colors go on which shelves
//!
//! Boxes are dealt in groups of `group_size` boxes of one color, each group on
//! that many distinct shelves, and no shelf ever receives the same color
//! twice. Generation is a pure function of a seed per attempt: attempt `n`
//! draws from `SimpleRng::stream(base, n)`, so a failed attempt leaves nothing
//! behind and attempts could run in any order.

use arrayvec::ArrayVec;
use thiserror::Error;

use cat_shelf_core::SimpleRng;
use cat_shelf_types::{Color, GameConfig, COLOR_COUNT};

/// Shelf/box counts for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    pub total_shelf_count: usize,
    pub empty_shelf_count: usize,
    pub total_box_count: usize,
    pub max_boxes_per_shelf: usize,
}

/// A generated layout; `colors[i]` runs bottom to top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub box_counts: Vec<usize>,
    pub colors: Vec<Vec<Color>>,
    /// 1-based index of the attempt that succeeded
    pub attempt: u32,
}

impl Layout {
    pub fn total_boxes(&self) -> usize {
        self.box_counts.iter().sum()
    }
}

/// Why a single attempt gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("group {group}: no shelf with spare capacity left")]
    NoShelfCapacity { group: usize },
    #[error("group {group}: every color is already on one of the chosen shelves")]
    NoUsableColor { group: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("group size must be positive")]
    ZeroGroupSize,
    #[error("need at least one non-empty shelf ({total} shelves, {empty} empty)")]
    InvalidShelfCount { total: usize, empty: usize },
    #[error("box count {requested} normalizes to {normalized}, which cannot fill {non_empty} shelves")]
    InvalidBoxCount {
        requested: usize,
        normalized: usize,
        non_empty: usize,
    },
    #[error("{max_per_shelf} boxes per shelf needs at least that many colors, have {colors}")]
    InvalidColorCount { max_per_shelf: usize, colors: usize },
    #[error("{boxes} boxes exceed capacity {capacity}")]
    InfeasibleCapacity { boxes: usize, capacity: usize },
    #[error("groups of {group_size} need that many non-empty shelves, have {non_empty}")]
    GroupWiderThanShelves { group_size: usize, non_empty: usize },
    #[error("no valid layout after {attempts} attempts (last: {})", OptionalFailure(.last))]
    Exhausted {
        attempts: u32,
        last: Option<AttemptFailure>,
    },
}

impl GenerationError {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationError::ZeroGroupSize
            | GenerationError::InvalidShelfCount { .. }
            | GenerationError::InvalidBoxCount { .. }
            | GenerationError::InvalidColorCount { .. } => "invalid_counts",
            GenerationError::InfeasibleCapacity { .. }
            | GenerationError::GroupWiderThanShelves { .. } => "infeasible",
            GenerationError::Exhausted { .. } => "exhausted",
        }
    }
}

struct OptionalFailure<'a>(&'a Option<AttemptFailure>);

impl std::fmt::Display for OptionalFailure<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(failure) => write!(f, "{failure}"),
            None => f.write_str("no attempts made"),
        }
    }
}

/// Validated request ready for attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Plan {
    total_shelves: usize,
    non_empty: usize,
    boxes: usize,
    max_per_shelf: usize,
}

#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    colors: Vec<Color>,
    group_size: usize,
    max_attempts: u32,
}

impl LayoutGenerator {
    /// `colors` is the ordered enabled palette; repeats are ignored
    pub fn new(colors: &[Color], group_size: usize, max_attempts: u32) -> Self {
        let mut unique: Vec<Color> = Vec::with_capacity(colors.len());
        for &c in colors {
            if !unique.contains(&c) {
                unique.push(c);
            }
        }
        Self {
            colors: unique,
            group_size,
            max_attempts,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            &config.palette.enabled_colors(),
            config.group_size,
            config.max_generation_attempts,
        )
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Generate a layout, retrying with fresh streams up to `max_attempts` times
    pub fn generate(
        &self,
        params: &LayoutParams,
        rng: &mut SimpleRng,
    ) -> Result<Layout, GenerationError> {
        let plan = self.plan(params)?;
        let base_seed = rng.next_u64();

        let mut last = None;
        for attempt in 0..self.max_attempts {
            match self.attempt(&plan, SimpleRng::stream(base_seed, attempt as u64)) {
                Ok((box_counts, colors)) => {
                    return Ok(Layout {
                        box_counts,
                        colors,
                        attempt: attempt + 1,
                    });
                }
                Err(failure) => last = Some(failure),
            }
        }
        Err(GenerationError::Exhausted {
            attempts: self.max_attempts,
            last,
        })
    }

    fn plan(&self, params: &LayoutParams) -> Result<Plan, GenerationError> {
        let g = self.group_size;
        if g == 0 {
            return Err(GenerationError::ZeroGroupSize);
        }
        let total = params.total_shelf_count;
        let empty = params.empty_shelf_count;
        if empty >= total {
            return Err(GenerationError::InvalidShelfCount { total, empty });
        }
        let non_empty = total - empty;

        let normalized = params.total_box_count / g * g;
        if normalized == 0 || normalized < non_empty {
            return Err(GenerationError::InvalidBoxCount {
                requested: params.total_box_count,
                normalized,
                non_empty,
            });
        }

        let max_per_shelf = params.max_boxes_per_shelf;
        if max_per_shelf == 0 || max_per_shelf > self.colors.len() {
            return Err(GenerationError::InvalidColorCount {
                max_per_shelf,
                colors: self.colors.len(),
            });
        }

        let capacity = non_empty * max_per_shelf;
        if normalized > capacity {
            return Err(GenerationError::InfeasibleCapacity {
                boxes: normalized,
                capacity,
            });
        }
        if non_empty < g {
            return Err(GenerationError::GroupWiderThanShelves {
                group_size: g,
                non_empty,
            });
        }

        Ok(Plan {
            total_shelves: total,
            non_empty,
            boxes: normalized,
            max_per_shelf,
        })
    }

    fn attempt(
        &self,
        plan: &Plan,
        mut rng: SimpleRng,
    ) -> Result<(Vec<usize>, Vec<Vec<Color>>), AttemptFailure> {
        let mut order: Vec<usize> = (0..plan.total_shelves).collect();
        rng.shuffle(&mut order);
        let mut filled = order[..plan.non_empty].to_vec();
        filled.sort_unstable();

        let counts = balanced_counts(plan, &filled, &mut rng);

        let mut remaining = counts.clone();
        let mut held: Vec<ArrayVec<Color, COLOR_COUNT>> =
            vec![ArrayVec::new(); plan.total_shelves];
        let mut usage = [0usize; COLOR_COUNT];
        let mut chosen: Vec<usize> = Vec::with_capacity(self.group_size);
        let mut ties: Vec<usize> = Vec::with_capacity(filled.len());
        let mut usable: Vec<Color> = Vec::with_capacity(self.colors.len());

        for group in 0..plan.boxes / self.group_size {
            chosen.clear();
            for _ in 0..self.group_size {
                let best = filled
                    .iter()
                    .filter(|&&s| remaining[s] > 0 && !chosen.contains(&s))
                    .map(|&s| remaining[s])
                    .max()
                    .ok_or(AttemptFailure::NoShelfCapacity { group })?;
                ties.clear();
                ties.extend(
                    filled
                        .iter()
                        .copied()
                        .filter(|&s| remaining[s] == best && !chosen.contains(&s)),
                );
                let pick = *rng
                    .choose(&ties)
                    .ok_or(AttemptFailure::NoShelfCapacity { group })?;
                chosen.push(pick);
            }

            usable.clear();
            usable.extend(
                self.colors
                    .iter()
                    .copied()
                    .filter(|c| chosen.iter().all(|&s| !held[s].contains(c))),
            );
            let least_used = usable
                .iter()
                .map(|c| usage[c.index()])
                .min()
                .ok_or(AttemptFailure::NoUsableColor { group })?;
            usable.retain(|c| usage[c.index()] == least_used);
            let color = *rng
                .choose(&usable)
                .ok_or(AttemptFailure::NoUsableColor { group })?;

            usage[color.index()] += 1;
            for &s in &chosen {
                held[s]
                    .try_push(color)
                    .map_err(|_| AttemptFailure::NoShelfCapacity { group })?;
                remaining[s] -= 1;
            }
        }

        let colors = held
            .into_iter()
            .map(|mut shelf| {
                rng.shuffle(&mut shelf);
                shelf.to_vec()
            })
            .collect();
        Ok((counts, colors))
    }
}

/// Deal boxes one at a time to a least-filled shelf (random tie-break)
fn balanced_counts(plan: &Plan, filled: &[usize], rng: &mut SimpleRng) -> Vec<usize> {
    let mut counts = vec![0usize; plan.total_shelves];
    let mut ties: Vec<usize> = Vec::with_capacity(filled.len());
    for _ in 0..plan.boxes {
        let Some(least) = filled
            .iter()
            .map(|&s| counts[s])
            .filter(|&n| n < plan.max_per_shelf)
            .min()
        else {
            break;
        };
        ties.clear();
        ties.extend(filled.iter().copied().filter(|&s| counts[s] == least));
        if let Some(&s) = rng.choose(&ties) {
            counts[s] += 1;
        }
    }
    counts
}
