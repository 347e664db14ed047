use std::{
    fmt,
    ops::{Add, Sub},
};

use crate::{Result, SimError};

/// A cell coordinate. Signed so that neighbor offsets may step off the grid.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

#[macro_export]
macro_rules! pos {
    ($row:expr, $col:expr) => {
        $crate::Pos {
            row: $row,
            col: $col,
        }
    };
}

impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        pos!(self.row + rhs.row, self.col + rhs.col)
    }
}

impl Sub for Pos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        pos!(self.row - rhs.row, self.col - rhs.col)
    }
}

/// Grid dimensions, both at least 1. Only [`Size::new`] builds one.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Size {
    rows: usize,
    cols: usize,
}

impl Size {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 {
            return Err(SimError::invalid("rows", rows, "must be at least 1"));
        }
        if cols == 0 {
            return Err(SimError::invalid("cols", cols, "must be at least 1"));
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn area(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.rows
            && (pos.col as usize) < self.cols
    }
}

impl TryFrom<(usize, usize)> for Size {
    type Error = SimError;
    fn try_from((rows, cols): (usize, usize)) -> Result<Self> {
        Self::new(rows, cols)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[test]
fn test_pos_arithmetic() {
    assert_eq!(pos!(1, 2) + pos!(-1, 1), pos!(0, 3));
    assert_eq!(pos!(1, 2) - pos!(2, 2), pos!(-1, 0));
}

#[test]
fn test_size_contains() {
    let size = Size::new(2, 3).unwrap();
    assert!(size.contains(pos!(0, 0)));
    assert!(size.contains(pos!(1, 2)));
    assert!(!size.contains(pos!(2, 0)));
    assert!(!size.contains(pos!(0, 3)));
    assert!(!size.contains(pos!(-1, 0)));
}

#[test]
fn test_size_rejects_zero() {
    assert!(matches!(
        Size::new(0, 4),
        Err(SimError::InvalidParameter { name: "rows", .. })
    ));
    assert!(Size::try_from((4, 0)).is_err());
    let size = Size::try_from((3, 5)).unwrap();
    assert_eq!((size.rows(), size.cols(), size.area()), (3, 5, 15));
}
