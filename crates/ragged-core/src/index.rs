//! Per-axis index specifications.
//!
//! An [`Index`] describes what to select along one axis: everything, one
//! position, a stepped range, or an explicit list of positions. Batch and
//! feature axes have a fixed size and are resolved eagerly into position
//! lists; the item axis is resolved per sequence because every sequence has
//! its own length.
//!
//! # Examples
//!
//! ```
//! use ragged_core::Index;
//!
//! assert_eq!(Index::from(2), Index::At(2));
//! assert_eq!(Index::from(1..3), Index::Range { start: 1, end: Some(3), step: 1 });
//! assert_eq!(Index::from(..), Index::All);
//! assert_eq!(Index::from(vec![1, 3, 0]), Index::List(vec![1, 3, 0]));
//! assert_eq!(Index::stepped(0, 2, 3), Index::Range { start: 0, end: Some(2), step: 3 });
//! ```

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use smallvec::SmallVec;

use crate::error::{ArgumentError, RaggedError, RaggedResult};

/// Resolved feature column list; feature widths are usually small.
pub type Columns = SmallVec<[usize; 8]>;

/// Selection along a single axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Index {
    /// Every position
    #[default]
    All,
    /// A single position
    At(usize),
    /// Positions `start, start + step, ...` below `end` (unbounded if `None`)
    Range {
        start: usize,
        end: Option<usize>,
        step: usize,
    },
    /// Explicit positions, in order, repeats allowed
    List(Vec<usize>),
}

impl Index {
    /// Stepped range `start..end` taking every `step`-th position.
    pub fn stepped(start: usize, end: usize, step: usize) -> Self {
        Index::Range {
            start,
            end: Some(end),
            step,
        }
    }

    /// Whether this selects every position of the axis.
    pub fn is_full(&self) -> bool {
        match self {
            Index::All => true,
            Index::Range {
                start: 0,
                end: None,
                step: 1,
            } => true,
            _ => false,
        }
    }

    /// Resolve against a fixed-size axis.
    ///
    /// Ranges are clamped to the axis like host slices; single positions and
    /// list entries must be in bounds.
    pub(crate) fn resolve(&self, axis: usize, size: usize) -> RaggedResult<Vec<usize>> {
        match self {
            Index::All => Ok((0..size).collect()),
            Index::At(i) => {
                if *i >= size {
                    return Err(RaggedError::out_of_bounds(axis, *i, size));
                }
                Ok(vec![*i])
            }
            Index::Range { start, end, step } => {
                if *step == 0 {
                    return Err(ArgumentError::ZeroStep.into());
                }
                let end = end.map_or(size, |e| e.min(size));
                let start = (*start).min(end);
                Ok((start..end).step_by(*step).collect())
            }
            Index::List(positions) => {
                if let Some(&bad) = positions.iter().find(|&&p| p >= size) {
                    return Err(RaggedError::out_of_bounds(axis, bad, size));
                }
                Ok(positions.clone())
            }
        }
    }

    /// Resolve a feature-axis selection into a column list.
    pub(crate) fn resolve_columns(&self, features: usize) -> RaggedResult<Columns> {
        Ok(self.resolve(2, features)?.into_iter().collect())
    }

    /// Validate an item-axis selection; it is resolved later per sequence.
    pub(crate) fn item_positions(&self) -> RaggedResult<ItemPositions> {
        match self {
            Index::All => Ok(ItemPositions::Range {
                start: 0,
                end: None,
                step: 1,
            }),
            Index::At(i) => Ok(ItemPositions::Range {
                start: *i,
                end: Some(i.saturating_add(1)),
                step: 1,
            }),
            Index::Range { start, end, step } => {
                if *step == 0 {
                    return Err(ArgumentError::ZeroStep.into());
                }
                Ok(ItemPositions::Range {
                    start: *start,
                    end: *end,
                    step: *step,
                })
            }
            Index::List(positions) => Ok(ItemPositions::List(positions.clone())),
        }
    }
}

/// Raw item-axis positions requested by a selection.
///
/// The same positions apply to every selected sequence; positions past a
/// sequence's length select nothing from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemPositions {
    Range {
        start: usize,
        end: Option<usize>,
        step: usize,
    },
    List(Vec<usize>),
}

impl ItemPositions {
    /// Positions that exist in a sequence of the given length, in order.
    pub fn within(&self, length: usize) -> Vec<usize> {
        match self {
            ItemPositions::Range { start, end, step } => {
                let end = end.map_or(length, |e| e.min(length));
                if *start >= end {
                    Vec::new()
                } else {
                    (*start..end).step_by(*step).collect()
                }
            }
            ItemPositions::List(positions) => {
                positions.iter().copied().filter(|&p| p < length).collect()
            }
        }
    }

    /// Number of positions that exist in a sequence of the given length.
    pub fn count_within(&self, length: usize) -> usize {
        match self {
            ItemPositions::Range { start, end, step } => {
                let end = end.map_or(length, |e| e.min(length));
                if *start >= end {
                    0
                } else {
                    (end - start).div_ceil(*step)
                }
            }
            ItemPositions::List(positions) => positions.iter().filter(|&&p| p < length).count(),
        }
    }
}

impl From<usize> for Index {
    fn from(i: usize) -> Self {
        Index::At(i)
    }
}

impl From<Range<usize>> for Index {
    fn from(r: Range<usize>) -> Self {
        Index::Range {
            start: r.start,
            end: Some(r.end),
            step: 1,
        }
    }
}

impl From<RangeFrom<usize>> for Index {
    fn from(r: RangeFrom<usize>) -> Self {
        Index::Range {
            start: r.start,
            end: None,
            step: 1,
        }
    }
}

impl From<RangeTo<usize>> for Index {
    fn from(r: RangeTo<usize>) -> Self {
        Index::Range {
            start: 0,
            end: Some(r.end),
            step: 1,
        }
    }
}

impl From<RangeFull> for Index {
    fn from(_: RangeFull) -> Self {
        Index::All
    }
}

impl From<Vec<usize>> for Index {
    fn from(v: Vec<usize>) -> Self {
        Index::List(v)
    }
}

impl From<&[usize]> for Index {
    fn from(v: &[usize]) -> Self {
        Index::List(v.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Index {
    fn from(v: [usize; N]) -> Self {
        Index::List(v.to_vec())
    }
}
