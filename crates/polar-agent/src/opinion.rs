//! Opinion values and group labels.

use std::fmt;

/// An opinion on a single issue axis: 0 and 1 are opposite extremes, 0.5 is
/// neutral.
///
/// The inner value is private and every constructor clamps into [0, 1], so an
/// out-of-range opinion cannot be represented.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Opinion(f64);

impl Opinion {
    pub const MIN: Opinion = Opinion(0.0);
    pub const NEUTRAL: Opinion = Opinion(0.5);
    pub const MAX: Opinion = Opinion(1.0);

    /// Clamp `value` into [0, 1].
    #[inline]
    pub fn new(value: f64) -> Self {
        debug_assert!(!value.is_nan(), "opinion must not be NaN");
        Opinion(value.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Absolute distance to `other`.
    #[inline]
    pub fn distance(self, other: Opinion) -> f64 {
        (self.0 - other.0).abs()
    }

    /// Move toward `target` by fraction `r` of the gap.
    #[inline]
    pub fn toward(self, target: Opinion, r: f64) -> Opinion {
        Opinion::new(self.0 + (target.0 - self.0) * r)
    }

    /// Move away from `target` by fraction `r` of the gap.
    #[inline]
    pub fn away_from(self, target: Opinion, r: f64) -> Opinion {
        Opinion::new(self.0 + (self.0 - target.0) * r)
    }
}

impl From<Opinion> for f64 {
    #[inline]
    fn from(o: Opinion) -> f64 {
        o.0
    }
}

impl fmt::Display for Opinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Group label used by the group-affinity stage.
///
/// `Neutral` agents never trigger affinity effects themselves.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Group {
    Left,
    #[default]
    Neutral,
    Right,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Left, Group::Neutral, Group::Right];
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Group::Left    => "left",
            Group::Neutral => "neutral",
            Group::Right   => "right",
        };
        f.write_str(s)
    }
}
