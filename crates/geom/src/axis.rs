use std::fmt;

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Axis {
    /// Horizontal axis.
    #[default]
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    /// Both axes, in the order the layout engine resolves them.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    /// The perpendicular axis.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Index of this axis into a per-axis `[T; 2]` array.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips() {
        assert_eq!(Axis::X.other(), Axis::Y);
        assert_eq!(Axis::Y.other(), Axis::X);
        assert_eq!(Axis::X.other().other(), Axis::X);
    }

    #[test]
    fn index_matches_all() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
        }
    }
}
