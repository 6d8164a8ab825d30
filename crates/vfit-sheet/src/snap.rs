#![forbid(unsafe_code)]

//! Snap geometry and destination selection.
//!
//! Offsets are signed distances from the closed resting position; raising
//! the sheet makes the offset more negative. For a viewport of height `H`:
//!
//! | Tier | Offset |
//! |------|--------|
//! | `Closed` | `0` |
//! | `Mid` | `-H * mid_fraction` |
//! | `Full` | `-H * full_fraction` |
//!
//! Candidates are always listed from `Closed` toward the most open allowed
//! tier. A tier that would not be strictly more open than the one before it
//! is dropped, so a zero-height viewport yields only `Closed`.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// A resting tier of the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum SnapPoint {
    Closed,
    Mid,
    Full,
}

impl SnapPoint {
    /// Tiers in declaration order, least open first.
    pub const ALL: [SnapPoint; 3] = [SnapPoint::Closed, SnapPoint::Mid, SnapPoint::Full];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Mid => "mid",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for SnapPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The most open tier the active screen allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum MaxSnapPoint {
    /// Every tier up to `Full` is reachable.
    #[default]
    Unrestricted,
    /// Tiers above the given one are excluded from the candidate set.
    Capped(SnapPoint),
}

impl MaxSnapPoint {
    /// Most open tier allowed.
    #[must_use]
    pub fn ceiling(self) -> SnapPoint {
        match self {
            Self::Unrestricted => SnapPoint::Full,
            Self::Capped(point) => point,
        }
    }

    #[must_use]
    pub fn allows(self, point: SnapPoint) -> bool {
        point <= self.ceiling()
    }
}

/// A tier paired with its concrete offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: SnapPoint,
    pub offset: f64,
}

impl SnapTarget {
    pub const CLOSED: SnapTarget = SnapTarget {
        point: SnapPoint::Closed,
        offset: 0.0,
    };

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.point == SnapPoint::Closed
    }
}

/// Snap offsets for one viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapGeometry {
    mid: f64,
    full: f64,
}

impl SnapGeometry {
    /// Compute offsets for `viewport_height`.
    ///
    /// Non-positive or non-finite heights put every tier at `0`, and so does
    /// a non-finite fraction for its own tier.
    #[must_use]
    pub fn new(viewport_height: f64, mid_fraction: f64, full_fraction: f64) -> Self {
        let h = if viewport_height.is_finite() && viewport_height > 0.0 {
            viewport_height
        } else {
            0.0
        };
        // `0.0 * -x` is `-0.0`; normalize so offsets compare cleanly.
        let scale = |fraction: f64| {
            if !fraction.is_finite() {
                return 0.0;
            }
            let offset = -h * fraction.clamp(0.0, 1.0);
            if offset == 0.0 { 0.0 } else { offset }
        };
        Self {
            mid: scale(mid_fraction),
            full: scale(full_fraction),
        }
    }

    /// Offset of `point`.
    #[must_use]
    pub fn offset(&self, point: SnapPoint) -> f64 {
        match point {
            SnapPoint::Closed => 0.0,
            SnapPoint::Mid => self.mid,
            SnapPoint::Full => self.full,
        }
    }

    /// Allowed targets from `Closed` to the most open, each strictly more
    /// open than the previous one.
    #[must_use]
    pub fn candidates(&self, max: MaxSnapPoint) -> Vec<SnapTarget> {
        let mut out: Vec<SnapTarget> = Vec::with_capacity(SnapPoint::ALL.len());
        for point in SnapPoint::ALL {
            if !max.allows(point) {
                break;
            }
            let offset = self.offset(point);
            match out.last() {
                Some(prev) if offset >= prev.offset => {}
                _ => out.push(SnapTarget { point, offset }),
            }
        }
        out
    }

    /// The most open allowed target.
    #[must_use]
    pub fn active_max(&self, max: MaxSnapPoint) -> SnapTarget {
        self.candidates(max)
            .last()
            .copied()
            .unwrap_or(SnapTarget::CLOSED)
    }

    /// Target for `point`, limited to the most open allowed tier.
    #[must_use]
    pub fn target(&self, point: SnapPoint, max: MaxSnapPoint) -> SnapTarget {
        let candidates = self.candidates(max);
        candidates
            .iter()
            .rev()
            .find(|t| t.point <= point)
            .copied()
            .unwrap_or(SnapTarget::CLOSED)
    }

    /// Clamp `offset` into `[active_max, 0]`.
    #[must_use]
    pub fn clamp(&self, offset: f64, max: MaxSnapPoint) -> f64 {
        offset.clamp(self.active_max(max).offset, 0.0)
    }
}

/// Choose where a released sheet should settle.
///
/// `candidates` must be ordered from `Closed` toward the most open tier, as
/// returned by [`SnapGeometry::candidates`]. Velocity is in offset units per
/// second; negative is upward.
///
/// - A release faster than `fling_threshold` (strictly) picks by direction:
///   upward takes the nearest tier more open than `current` (or the most
///   open tier), downward takes the nearest tier less open than `current`
///   (or `Closed`).
/// - Otherwise the nearest tier wins; on a tie the earlier tier wins.
#[must_use]
pub fn select_destination(
    candidates: &[SnapTarget],
    current: f64,
    velocity: f64,
    fling_threshold: f64,
) -> SnapTarget {
    let Some(&most_open) = candidates.last() else {
        return SnapTarget::CLOSED;
    };

    if velocity.abs() > fling_threshold {
        if velocity < 0.0 {
            return candidates
                .iter()
                .find(|t| t.offset < current)
                .copied()
                .unwrap_or(most_open);
        }
        return candidates
            .iter()
            .rev()
            .find(|t| t.offset > current)
            .copied()
            .unwrap_or(SnapTarget::CLOSED);
    }

    let mut best = candidates[0];
    let mut best_distance = (current - best.offset).abs();
    for &candidate in &candidates[1..] {
        let distance = (current - candidate.offset).abs();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}
