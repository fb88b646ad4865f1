use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a render layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: SessionState,
    pub topology: GridTopology,
    pub cells: Array2<CellView>,
    pub player: Cell,
    pub hint_target: Option<Cell>,
    pub target_label: Label,
    pub progress: Label,
    pub elapsed: Millis,
    pub completion_time: Option<Millis>,
}

impl Snapshot {
    /// `None` before the first board exists.
    pub fn from_session<C: Clock>(session: &GameSession<C>) -> Option<Self> {
        let topology = session.board()?.topology();
        let mut cells = Array2::from_elem(topology.dim(), CellView::Empty);
        let mut hint_target = None;

        for row in 0..topology.rows {
            for col in 0..topology.cols {
                let cell = Cell::new(row, col);
                cells[cell.to_nd_index()] = session.cell_view(cell);
                if session.is_hint_target(cell) {
                    hint_target = Some(cell);
                }
            }
        }

        Some(Self {
            state: session.state(),
            topology,
            cells,
            player: session.player_cell(),
            hint_target,
            target_label: session.target_label(),
            progress: session.progress(),
            elapsed: session.elapsed_time(),
            completion_time: session.completion_time(),
        })
    }

    pub fn view_at(&self, cell: Cell) -> CellView {
        self.cells
            .get(cell.to_nd_index())
            .copied()
            .unwrap_or_default()
    }

    /// Number of cells currently showing their label.
    pub fn visible_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|view| view.label().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn line_session() -> (GameSession<ManualClock>, ManualClock) {
        let grid = GridTopology::new(3, 4).unwrap();
        let path: Vec<_> = (0..4).map(|col| Cell::new(1, col)).collect();
        let board = Board::from_path(grid, &path).unwrap();
        let clock = ManualClock::new(0);
        let session = GameSession::with_board(board, Timings::default(), clock.clone());
        (session, clock)
    }

    #[test]
    fn intro_without_board_has_no_snapshot() {
        let session = GameSession::with_clock(
            GameConfig::default(),
            Timings::default(),
            ManualClock::new(0),
            5,
        );

        assert_eq!(Snapshot::from_session(&session), None);
    }

    #[test]
    fn snapshot_follows_visibility_rules() {
        let (mut session, clock) = line_session();
        session.retry_game();

        let showing = Snapshot::from_session(&session).unwrap();
        assert_eq!(showing.state, SessionState::Showing);
        assert_eq!(showing.visible_count(), 4);
        assert_eq!(showing.view_at(Cell::new(0, 0)), CellView::Empty);
        assert_eq!(showing.view_at(Cell::new(7, 7)), CellView::Empty);

        clock.set(2000);
        session.tick();
        let playing = Snapshot::from_session(&session).unwrap();
        assert_eq!(playing.visible_count(), 1);
        assert_eq!(playing.view_at(Cell::new(1, 0)), CellView::Visible(0));
        assert_eq!(playing.view_at(Cell::new(1, 2)), CellView::Obscured);
        assert_eq!(playing.hint_target, None);
    }

    #[test]
    fn snapshot_marks_hint_target_after_peek() {
        let (mut session, clock) = line_session();
        session.retry_game();
        clock.set(4000);
        session.tick();

        let snapshot = Snapshot::from_session(&session).unwrap();

        assert_eq!(snapshot.hint_target, Some(Cell::new(1, 1)));
        assert_eq!(snapshot.elapsed, 4000);
        assert_eq!(snapshot.progress, 0);
    }

    #[test]
    fn snapshot_serializes_for_the_ui() {
        let (mut session, clock) = line_session();
        session.retry_game();
        clock.set(2000);
        session.tick();
        session.submit_move(Direction::Right);

        let snapshot = Snapshot::from_session(&session).unwrap();
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["state"], "Playing");
        assert_eq!(json["target_label"], 2);
        assert_eq!(json["player"]["col"], 1);
        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
