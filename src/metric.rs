//! Second order changes: how far the pattern of change between two frames
//! strays from what Life itself would predict for that pattern.

use crate::{rule::transition, Cell, Grid, Result};

/// Cells that differ between the two grids, as a grid of its own.
pub fn abs_difference(a: &Grid, b: &Grid) -> Result<Grid> {
    a.zip_with(b, |x, y| Cell::from(x != y))
}

/// Steps the first order difference as a Life grid and counts the cells
/// where that prediction disagrees with the difference itself.
pub fn second_order_changes(prev: &Grid, next: &Grid) -> Result<u64> {
    let first_order = abs_difference(prev, next)?;
    let predicted = transition(&first_order);
    let second_order = abs_difference(&first_order, &predicted)?;
    Ok(second_order.population())
}
