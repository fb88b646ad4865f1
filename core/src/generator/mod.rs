use crate::*;
pub use random::*;

mod random;

pub trait PathGenerator {
    /// Always returns a usable board, `length` is the label of the goal cell.
    fn generate(self, topology: GridTopology, length: Label) -> Board;
}

/// Row-major path reversing direction on every other row, cut off at the last row.
pub fn zigzag_path(topology: GridTopology, length: Label) -> Vec<Cell> {
    let cols = usize::from(topology.cols);
    (0..=usize::from(length))
        .map(|i| {
            let row = i / cols;
            let col = if row % 2 == 0 {
                i % cols
            } else {
                cols - 1 - (i % cols)
            };
            (row, col)
        })
        .take_while(|&(row, _)| row < usize::from(topology.rows))
        .map(|(row, col)| Cell::new(row as Coord, col as Coord))
        .collect()
}

#[cfg(test)]
pub(crate) fn assert_path_invariants(board: &Board) {
    let topology = board.topology();
    let path = board.path();

    let labeled = (0..topology.rows)
        .flat_map(|row| (0..topology.cols).map(move |col| Cell::new(row, col)))
        .filter(|&cell| board.label_at(cell).is_some())
        .count();
    assert_eq!(labeled, path.len(), "every labeled cell is on the path");

    for (label, &cell) in path.iter().enumerate() {
        assert!(topology.contains(cell), "{cell:?} out of bounds");
        assert_eq!(board.label_at(cell), Some(label as Label));
        assert_eq!(board.cell_of(label as Label), Some(cell));
        if label > 0 {
            assert!(
                path[label - 1].is_adjacent(cell),
                "label {label} at {cell:?} not adjacent to {:?}",
                path[label - 1]
            );
        }
    }
}
