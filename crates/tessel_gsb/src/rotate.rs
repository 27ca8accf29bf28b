//! Rotation canonicalization of switch blocks.
//!
//! Corner and border switch blocks see a different port layout than interior
//! ones, and interior tiles see the fan-out pattern shifted by their grid
//! position. Relabeling sides and cyclically shifting same-direction tracks
//! aligns all of them with the `(0, 0)` and `(1, 1)` baselines, so the
//! equivalence engine can merge classes that raw comparison keeps apart.
//!
//! A rotation never touches the original tile: [`rotate_for_mirror`] returns a
//! [`RotatedGsb`] owning a relabeled copy.

use crate::gsb::RrGsb;
use serde::{Deserialize, Serialize};
use tessel_common::{Coord, GridRange};
use tessel_rrgraph::{Direction, Side};

/// Parameters of the fan-out pattern assumed by rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationParams {
    /// Track shift per grid step (`Fco_offset`).
    pub fco_offset: usize,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self { fco_offset: 1 }
    }
}

/// One relabeling step of a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStep {
    /// Exchange the channels and OPINs of two sides.
    SwapSides(Side, Side),
    /// Cyclically shift the `direction` tracks of `side` by `offset`.
    Rotate {
        /// Side whose channel is shifted.
        side: Side,
        /// Only tracks with this direction move.
        direction: Direction,
        /// Shift amount.
        offset: usize,
        /// Shift backwards instead of forwards.
        counter: bool,
    },
}

impl RotationStep {
    fn inverse(self) -> Self {
        match self {
            RotationStep::SwapSides(..) => self,
            RotationStep::Rotate {
                side,
                direction,
                offset,
                counter,
            } => RotationStep::Rotate {
                side,
                direction,
                offset,
                counter: !counter,
            },
        }
    }
}

/// Shifts the increasing tracks of a pair of opposite sides forwards and their
/// decreasing tracks backwards.
fn shift_pair(inc: [Side; 2], dec: [Side; 2], offset: usize) -> [RotationStep; 4] {
    let step = |side, direction, counter| RotationStep::Rotate {
        side,
        direction,
        offset,
        counter,
    };
    [
        step(inc[0], Direction::Increasing, false),
        step(inc[1], Direction::Increasing, false),
        step(dec[0], Direction::Decreasing, true),
        step(dec[1], Direction::Decreasing, true),
    ]
}

/// Returns the relabeling steps for the switch block at `coord`.
///
/// Corners are handled first. The bottom border is a baseline; the top and
/// right borders come next, so a single-column fabric still shifts its
/// `x == nx == 0` tiles. The left border and the `(1, 1)` tile are baselines;
/// everything else is interior. Shift amounts saturate at `usize::MAX`.
pub fn rotation_plan(range: GridRange, coord: Coord, params: RotationParams) -> Vec<RotationStep> {
    let (x, y) = (coord.x, coord.y);
    let (nx, ny) = (range.nx, range.ny);
    let off = params.fco_offset;
    let horizontal = |offset| shift_pair([Side::Right, Side::Left], [Side::Left, Side::Right], offset);
    let vertical = |offset| shift_pair([Side::Top, Side::Bottom], [Side::Bottom, Side::Top], offset);

    let mut plan = Vec::new();
    if x == 0 && y == 0 {
        // baseline
    } else if x == 0 && y == ny {
        plan.push(RotationStep::SwapSides(Side::Top, Side::Bottom));
    } else if x == nx && y == ny {
        plan.push(RotationStep::SwapSides(Side::Top, Side::Bottom));
        plan.push(RotationStep::SwapSides(Side::Left, Side::Right));
    } else if x == nx && y == 0 {
        plan.push(RotationStep::SwapSides(Side::Left, Side::Right));
    } else if y == 0 {
        // baseline
    } else if y == ny {
        plan.extend(horizontal(off.saturating_mul(x - 1)));
    } else if x == nx {
        plan.extend(vertical(off.saturating_mul(y - 1)));
    } else if x == 0 || (x == 1 && y == 1) {
        // baseline
    } else {
        let [t_inc, b_inc, b_dec, t_dec] = vertical(off.saturating_mul(y - 1));
        let [r_inc, l_inc, l_dec, r_dec] = horizontal(off.saturating_mul(x - 1));
    }
    plan.retain(|step| !matches!(step, RotationStep::Rotate { offset: 0, .. }));
    plan
}

/// Returns the steps undoing `plan`.
pub fn invert_plan(plan: &[RotationStep]) -> Vec<RotationStep> {
    plan.iter().rev().map(|step| step.inverse()).collect()
}

/// A read-only rotated copy of a switch block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatedGsb {
    gsb: RrGsb,
    wrapped: bool,
}

impl RotatedGsb {
    /// The relabeled tile.
    pub fn as_gsb(&self) -> &RrGsb {
        &self.gsb
    }

    /// Coordinate of the original tile.
    pub fn coord(&self) -> Coord {
        self.gsb.coord()
    }

    /// Returns `true` if some shifted track subset was no longer than the
    /// configured offset, so one grid step already wraps the whole subset.
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }
}

/// Applies `plan` to a copy of `gsb`.
///
/// `fco_offset` is only used to flag subsets that a single grid step wraps.
pub fn apply_plan(gsb: &RrGsb, plan: &[RotationStep], fco_offset: usize) -> RotatedGsb {
    let mut rotated = gsb.clone();
    let mut wrapped = false;
    for &step in plan {
        match step {
            RotationStep::SwapSides(a, b) => {
                rotated.swap_opins(a, b);
                rotated.swap_chan(a, b);
            }
            RotationStep::Rotate {
                side,
                direction,
                offset,
                counter,
            } => {
                let n = rotated.rotate_side(side, direction, offset, counter);
                wrapped |= n > 0 && offset > 0 && n <= fco_offset;
            }
        }
    }
    RotatedGsb {
        gsb: rotated,
        wrapped,
    }
}

/// Rotates the switch block `gsb` according to its position in `range`.
pub fn rotate_for_mirror(range: GridRange, gsb: &RrGsb, params: RotationParams) -> RotatedGsb {
    let plan = rotation_plan(range, gsb.coord(), params);
    apply_plan(gsb, &plan, params.fco_offset)
}
