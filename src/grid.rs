use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use metrohash::MetroHash64;

use crate::{pos, Pos, Result, SimError, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    alive: bool,
}

impl Cell {
    pub fn alive() -> Self {
        Self { alive: true }
    }

    pub fn dead() -> Self {
        Self { alive: false }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// The cell as a number, always exactly 0 or 1.
    pub fn value(&self) -> u8 {
        self.alive as u8
    }

    pub fn from_value(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::dead()),
            1 => Ok(Self::alive()),
            other => Err(SimError::invalid("cell", other, "must be 0 or 1")),
        }
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        Self { alive }
    }
}

/// A fixed-size frame of binary cells, stored row-major.
///
/// Grids are values: nothing mutates a grid once built, a step always
/// produces a new one. Reads outside the bounds yield a dead cell, which
/// is the zero padding every neighborhood scan relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: Size,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn dead(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::dead(); size.area()],
        }
    }

    pub fn from_fn(size: Size, mut f: impl FnMut(Pos) -> Cell) -> Self {
        let cells = (0..size.rows())
            .flat_map(|row| (0..size.cols()).map(move |col| pos!(row as i32, col as i32)))
            .map(&mut f)
            .collect();
        Self { size, cells }
    }

    /// Builds a grid from literal rows of 0s and 1s.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: AsRef<[u8]>,
    {
        let mut cells = vec![];
        let mut width = None;
        let mut height = 0;
        for row in rows {
            let row = row.as_ref();
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(SimError::invalid("row", height, "rows must share one width"))
                }
                _ => (),
            }
            for &value in row {
                cells.push(Cell::from_value(value)?);
            }
            height += 1;
        }
        let size = Size::new(height, width.unwrap_or(0))?;
        Ok(Self { size, cells })
    }

    pub(crate) fn from_cells(size: Size, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(size.area(), cells.len());
        Self { size, cells }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    pub fn cols(&self) -> usize {
        self.size.cols()
    }

    pub fn get(&self, pos: Pos) -> Cell {
        if self.size.contains(pos) {
            self.cells[pos.row as usize * self.size.cols() + pos.col as usize]
        } else {
            Cell::dead()
        }
    }

    pub fn is_alive(&self, pos: Pos) -> bool {
        self.get(pos).is_alive()
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.size.cols();
        &self.cells[start..start + self.size.cols()]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.size.cols())
    }

    /// Number of alive cells, i.e. the sum over all cell values.
    pub fn population(&self) -> u64 {
        self.cells.iter().filter(|cell| cell.is_alive()).count() as u64
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.iter_rows()
            .map(|row| row.iter().map(Cell::value).collect())
            .collect()
    }

    /// Combines two grids of the same shape cell by cell.
    pub(crate) fn zip_with(&self, other: &Grid, f: impl Fn(Cell, Cell) -> Cell) -> Result<Grid> {
        if self.size != other.size {
            return Err(SimError::ShapeMismatch {
                left: self.size,
                right: other.size,
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Self::from_cells(self.size, cells))
    }

    /// 64 bit digest of the shape and the cells, for cheap replay comparison.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = MetroHash64::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.iter_rows().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let char = if cell.is_alive() { '#' } else { '.' };
                write!(f, "{char}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = SimError;

    /// Parses `#` as alive and `.` as dead, one line per row.
    fn from_str(text: &str) -> Result<Self> {
        let rows = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        '#' => Ok(1),
                        '.' => Ok(0),
                        other => Err(SimError::invalid("cell", other, "expected '#' or '.'")),
                    })
                    .collect::<Result<Vec<u8>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }
}
