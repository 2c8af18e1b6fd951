use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// PVQ value axis (Schwartz Portrait Values Questionnaire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    SelfDirection,
    Security,
    Universalism,
    Stimulation,
    Power,
    Achievement,
    Hedonism,
}

impl Axis {
    /// Canonical order. The first three are the axes of the legacy three-question quiz.
    pub const ALL: [Axis; 7] = [
        Axis::SelfDirection,
        Axis::Security,
        Axis::Universalism,
        Axis::Stimulation,
        Axis::Power,
        Axis::Achievement,
        Axis::Hedonism,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Axis::SelfDirection => "self_direction",
            Axis::Security => "security",
            Axis::Universalism => "universalism",
            Axis::Stimulation => "stimulation",
            Axis::Power => "power",
            Axis::Achievement => "achievement",
            Axis::Hedonism => "hedonism",
        }
    }

    /// Spreadsheet column header holding this axis
    pub fn column(&self) -> &'static str {
        match self {
            Axis::SelfDirection => "PVQ_自己方向性",
            Axis::Security => "PVQ_安全",
            Axis::Universalism => "PVQ_普遍主義",
            Axis::Stimulation => "PVQ_刺激",
            Axis::Power => "PVQ_権力",
            Axis::Achievement => "PVQ_達成",
            Axis::Hedonism => "PVQ_快楽",
        }
    }

    /// Accepts either the ASCII key or the spreadsheet column header.
    pub fn parse(raw: &str) -> Option<Axis> {
        let raw = raw.trim();
        Axis::ALL
            .iter()
            .copied()
            .find(|axis| axis.key() == raw || axis.column() == raw)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Axis -> value mapping. Only finite values are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisVector(BTreeMap<Axis, f64>);

impl AxisVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and stores nothing) when the value is NaN or infinite.
    pub fn insert(&mut self, axis: Axis, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.0.insert(axis, value);
        true
    }

    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.insert(axis, value);
        self
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.0.get(&axis).copied()
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.0.contains_key(&axis)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.0.iter().map(|(axis, value)| (*axis, *value))
    }

    /// Axes present in both vectors, as (axis, self value, other value).
    pub fn shared<'a>(
        &'a self,
        other: &'a AxisVector,
    ) -> impl Iterator<Item = (Axis, f64, f64)> + 'a {
        self.iter()
            .filter_map(move |(axis, value)| other.get(axis).map(|theirs| (axis, value, theirs)))
    }
}

impl FromIterator<(Axis, f64)> for AxisVector {
    fn from_iter<I: IntoIterator<Item = (Axis, f64)>>(iter: I) -> Self {
        let mut vector = AxisVector::new();
        for (axis, value) in iter {
            vector.insert(axis, value);
        }
        vector
    }
}

/// Limits applied to a quiz submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBounds {
    pub min_rating: i64,
    pub max_rating: i64,
    pub min_axes: usize,
    pub max_axes: usize,
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self {
            min_rating: 1,
            max_rating: 7,
            min_axes: 2,
            max_axes: Axis::ALL.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("at least {min} answered axes are required, got {got}")]
    TooFewAxes { got: usize, min: usize },

    #[error("at most {max} answered axes are allowed, got {got}")]
    TooManyAxes { got: usize, max: usize },

    #[error("rating {value} for {axis} is outside {min}..={max}")]
    OutOfRange {
        axis: Axis,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("axis {0} answered more than once")]
    DuplicateAxis(Axis),
}

/// A validated quiz submission
#[derive(Debug, Clone, PartialEq)]
pub struct UserResponse {
    ratings: AxisVector,
}

impl UserResponse {
    pub fn new<I>(ratings: I, bounds: &RatingBounds) -> Result<Self, RatingError>
    where
        I: IntoIterator<Item = (Axis, i64)>,
    {
        let mut vector = AxisVector::new();
        for (axis, value) in ratings {
            if vector.contains(axis) {
                return Err(RatingError::DuplicateAxis(axis));
            }
            if value < bounds.min_rating || value > bounds.max_rating {
                return Err(RatingError::OutOfRange {
                    axis,
                    value,
                    min: bounds.min_rating,
                    max: bounds.max_rating,
                });
            }
            vector.insert(axis, value as f64);
        }

        if vector.len() < bounds.min_axes {
            return Err(RatingError::TooFewAxes {
                got: vector.len(),
                min: bounds.min_axes,
            });
        }
        if vector.len() > bounds.max_axes {
            return Err(RatingError::TooManyAxes {
                got: vector.len(),
                max: bounds.max_axes,
            });
        }

        Ok(Self { ratings: vector })
    }

    pub fn vector(&self) -> &AxisVector {
        &self.ratings
    }
}
