use rayon::prelude::*;

use crate::{pos, Cell, Grid, Pos};

const NEIGHBOR_OFFSETS: [Pos; 8] = [
    pos!(-1, -1),
    pos!(-1, 0),
    pos!(-1, 1),
    pos!(0, -1),
    pos!(0, 1),
    pos!(1, -1),
    pos!(1, 0),
    pos!(1, 1),
];

pub fn get_neighbors(pos: Pos) -> impl Iterator<Item = Pos> {
    NEIGHBOR_OFFSETS.into_iter().map(move |offset| pos + offset)
}

/// Alive cells among the 8 adjacent positions. Positions off the grid
/// count as dead: the padding is constant zero, never wraparound.
pub fn neighbor_count(grid: &Grid, pos: Pos) -> u8 {
    get_neighbors(pos)
        .filter(|&neighbor| grid.is_alive(neighbor))
        .count() as u8
}

/// Birth on exactly 3 neighbors, survival on 2 or 3.
pub fn next_cell(cell: Cell, neighbor_count: u8) -> Cell {
    match (cell.is_alive(), neighbor_count) {
        (_, 3) => Cell::alive(), // born or stays
        (true, 2) => Cell::alive(), // stays
        _ => Cell::dead(), // dies or stays dead
    }
}

/// Computes the next generation.
///
/// Every output cell is read from the same input grid, so rows are
/// computed in parallel into disjoint slices of the output buffer.
pub fn transition(grid: &Grid) -> Grid {
    let size = grid.size();
    let mut cells = vec![Cell::dead(); size.area()];

    cells
        .par_chunks_mut(size.cols())
        .enumerate()
        .for_each(|(row, out)| {
            for (col, slot) in out.iter_mut().enumerate() {
                let pos = pos!(row as i32, col as i32);
                *slot = next_cell(grid.get(pos), neighbor_count(grid, pos));
            }
        });

    Grid::from_cells(size, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn test_all_dead_is_absorbing() {
        let dead = Grid::dead(Size::new(7, 5).unwrap());
        assert_eq!(transition(&dead), dead);
        assert_eq!(transition(&transition(&dead)), dead);
    }

    #[test]
    fn test_blinker_oscillates() {
        let vertical = grid(".#.\n.#.\n.#.");
        let horizontal = grid("...\n###\n...");
        assert_eq!(transition(&vertical), horizontal);
        assert_eq!(transition(&horizontal), vertical);
    }

    #[test]
    fn test_isolated_cell_dies() {
        let lonely = grid(".....\n.....\n..#..\n.....\n.....");
        assert_eq!(transition(&lonely), Grid::dead(lonely.size()));
    }

    #[test]
    fn test_block_is_still() {
        let block = grid("....\n.##.\n.##.\n....");
        assert_eq!(transition(&block), block);
    }

    #[test]
    fn test_block_in_corner_is_still() {
        let block = grid("##\n##");
        assert_eq!(transition(&block), block);
    }

    #[test]
    fn test_single_cell_grid() {
        assert_eq!(transition(&grid("#")), grid("."));
    }

    #[test]
    fn test_edges_do_not_wrap() {
        // with wraparound the three edge cells would feed the opposite column
        let edge = grid("#...\n#...\n#...");
        let next = transition(&edge);
        assert_eq!(next, grid("....\n##..\n...."));
    }

    #[test]
    fn test_glider_moves_diagonally() {
        let start = grid(
            ".#....\n\
             ..#...\n\
             ###...\n\
             ......\n\
             ......\n\
             ......",
        );
        let moved = grid(
            "......\n\
             ..#...\n\
             ...#..\n\
             .###..\n\
             ......\n\
             ......",
        );
        let after = (0..4).fold(start, |g, _| transition(&g));
        assert_eq!(after, moved);
    }

    #[test]
    fn test_neighbor_count_at_corner() {
        let full = grid("###\n###\n###");
        assert_eq!(neighbor_count(&full, pos!(0, 0)), 3);
        assert_eq!(neighbor_count(&full, pos!(0, 1)), 5);
        assert_eq!(neighbor_count(&full, pos!(1, 1)), 8);
    }

    #[test]
    fn test_transition_is_deterministic() {
        let soup = grid("#.##.\n.###.\n#...#\n##.#.");
        assert_eq!(transition(&soup), transition(&soup));
    }
}
