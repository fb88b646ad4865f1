use alloc::collections::vec_deque::Drain;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::timer::{Epoch, Timer, TimerQueue};
use crate::*;

/// Valid transitions:
/// - Intro -> Showing
/// - Showing -> Playing
/// - Playing -> GameOver
/// - Playing -> Complete
/// - any -> Showing, when a round is (re)started
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No round started yet
    Intro,
    /// Whole board on display before play starts
    Showing,
    Playing,
    /// Stepped on the wrong label
    GameOver,
    /// Reached the goal
    Complete,
}

impl SessionState {
    pub const fn accepts_moves(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver | Self::Complete)
    }

    /// Whether every label is on display regardless of hints.
    pub const fn shows_all(self) -> bool {
        matches!(self, Self::Intro | Self::Showing)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Intro
    }
}

/// Notifications for the presentation layer, drained with [`GameSession::events`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    StateChanged {
        from: SessionState,
        to: SessionState,
    },
    /// Fired once per correct step.
    Shake { duration: Millis, haptic: Millis },
    HintRevealed(Vec<Label>),
    HintHidden,
    Completed { time: Millis },
    Failed { progress: Label },
}

/// One player working through boards, round after round.
#[derive(Debug)]
pub struct GameSession<C: Clock = SystemClock> {
    config: GameConfig,
    timings: Timings,
    clock: C,
    rng: SmallRng,
    board: Option<Board>,
    state: SessionState,
    target: Label,
    player: Cell,
    started_at: Millis,
    elapsed: Millis,
    completion_time: Option<Millis>,
    last_move_at: Millis,
    revealed: BTreeSet<Label>,
    hint_disclosed: bool,
    timers: TimerQueue,
    /// Bumped on every state change.
    round_epoch: Epoch,
    /// Bumped on every state change and every legal move.
    idle_epoch: Epoch,
    events: VecDeque<SessionEvent>,
}

impl GameSession<SystemClock> {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_clock(config, Timings::default(), SystemClock::new(), seed)
    }
}

impl<C: Clock> GameSession<C> {
    pub fn with_clock(config: GameConfig, timings: Timings, clock: C, seed: u64) -> Self {
        Self {
            config,
            timings,
            clock,
            rng: SmallRng::seed_from_u64(seed),
            board: None,
            state: Default::default(),
            target: 1,
            player: Cell::new(0, 0),
            started_at: 0,
            elapsed: 0,
            completion_time: None,
            last_move_at: 0,
            revealed: BTreeSet::new(),
            hint_disclosed: false,
            timers: TimerQueue::default(),
            round_epoch: 0,
            idle_epoch: 0,
            events: VecDeque::new(),
        }
    }

    /// Session bound to an existing board, [`Self::retry_game`] plays it.
    pub fn with_board(board: Board, timings: Timings, clock: C) -> Self {
        let config = GameConfig::new_unchecked(board.topology(), board.goal());
        let mut session = Self::with_clock(config, timings, clock, 0);
        session.player = board.start();
        session.board = Some(board);
        session
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Next label the player must step onto.
    pub fn target_label(&self) -> Label {
        self.target
    }

    pub fn player_cell(&self) -> Cell {
        self.player
    }

    /// Time since the round started, refreshed by the clock tick while playing.
    pub fn elapsed_time(&self) -> Millis {
        self.elapsed
    }

    pub fn completion_time(&self) -> Option<Millis> {
        self.completion_time
    }

    pub fn last_move_at(&self) -> Millis {
        self.last_move_at
    }

    pub fn revealed_labels(&self) -> &BTreeSet<Label> {
        &self.revealed
    }

    pub fn has_disclosed_hint(&self) -> bool {
        self.hint_disclosed
    }

    /// Last label confirmed by a correct step.
    pub fn progress(&self) -> Label {
        match (self.state, &self.board) {
            (SessionState::Complete, Some(board)) => board.goal(),
            _ => self.target - 1,
        }
    }

    /// When the next timer is due, hosts can sleep until then before calling [`Self::tick`].
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_due()
    }

    pub fn events(&mut self) -> Drain<'_, SessionEvent> {
        self.events.drain(..)
    }

    pub fn is_player(&self, cell: Cell) -> bool {
        self.player == cell
    }

    pub fn cell_view(&self, cell: Cell) -> CellView {
        let Some(label) = self.board.as_ref().and_then(|board| board.label_at(cell)) else {
            return CellView::Empty;
        };

        let visible = self.state.shows_all()
            || label == 0
            || self.revealed.contains(&label)
            || self.is_player(cell);

        if visible {
            CellView::Visible(label)
        } else {
            CellView::Obscured
        }
    }

    /// Highlights the next label once a peek has come and gone.
    pub fn is_hint_target(&self, cell: Cell) -> bool {
        self.state.accepts_moves()
            && self.hint_disclosed
            && self.revealed.is_empty()
            && !self.is_player(cell)
            && self
                .board
                .as_ref()
                .and_then(|board| board.cell_of(self.target))
                == Some(cell)
    }

    /// Generates a fresh board and shows it.
    pub fn start_new_game(&mut self) {
        let seed = self.rng.random_range(0..=u64::MAX);
        let board =
            RandomPathGenerator::new(seed).generate(self.config.topology, self.config.path_len);
        log::debug!("New board from seed {}, fallback: {}", seed, board.is_fallback());
        self.board = Some(board);
        self.begin_round();
    }

    /// Shows the current board again from the start.
    pub fn retry_game(&mut self) {
        if self.board.is_none() {
            log::warn!("No board to retry, generating a new one");
            self.start_new_game();
            return;
        }
        self.begin_round();
    }

    /// Fires every timer due by now.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.advance_to(now);
    }

    pub fn submit_move(&mut self, direction: Direction) -> MoveOutcome {
        let now = self.clock.now();
        self.advance_to(now);

        if !self.state.accepts_moves() {
            log::trace!("Ignoring {:?} while {:?}", direction, self.state);
            return MoveOutcome::NoChange;
        }

        let Some((next, stepped, goal)) = self.validate_move(direction) else {
            return MoveOutcome::NoChange;
        };

        self.player = next;
        self.last_move_at = now;
        self.reset_idle(now);

        if stepped != self.target {
            let progress = self.target - 1;
            log::debug!(
                "Stepped on {} while {} was expected, progress {}",
                stepped,
                self.target,
                progress
            );
            self.elapsed = now - self.started_at;
            self.set_state(SessionState::GameOver);
            self.events.push_back(SessionEvent::Failed { progress });
            return MoveOutcome::Failed;
        }

        self.hint_disclosed = false;
        self.events.push_back(SessionEvent::Shake {
            duration: self.timings.shake,
            haptic: self.timings.haptic,
        });

        if stepped == goal {
            let time = now - self.started_at;
            self.elapsed = time;
            self.completion_time = Some(time);
            self.set_state(SessionState::Complete);
            self.events.push_back(SessionEvent::Completed { time });
            MoveOutcome::Completed
        } else {
            self.target += 1;
            MoveOutcome::Advanced
        }
    }

    /// Destination cell, its label, and the goal label when the move is physically legal.
    fn validate_move(&self, direction: Direction) -> Option<(Cell, Label, Label)> {
        let board = self.board.as_ref()?;
        let Some(next) = board.topology().step(self.player, direction) else {
            log::trace!("{:?} from {:?} leaves the grid", direction, self.player);
            return None;
        };
        let Some(stepped) = board.label_at(next) else {
            log::trace!("{:?} is empty", next);
            return None;
        };
        Some((next, stepped, board.goal()))
    }

    fn begin_round(&mut self) {
        let Some(start) = self.board.as_ref().map(Board::start) else {
            return;
        };
        let now = self.clock.now();

        self.target = 1;
        self.player = start;
        self.started_at = now;
        self.elapsed = 0;
        self.completion_time = None;
        self.last_move_at = now;
        self.revealed.clear();
        self.hint_disclosed = false;

        self.set_state(SessionState::Showing);
        self.timers
            .schedule(TimerKind::Dwell, now + self.timings.dwell, self.round_epoch);
    }

    /// Switches state, invalidating every timer scheduled under the previous one.
    fn set_state(&mut self, to: SessionState) {
        let from = self.state;
        self.timers.cancel_all();
        self.round_epoch += 1;
        self.idle_epoch += 1;
        self.state = to;
        log::debug!("Session {:?} -> {:?}", from, to);
        self.events.push_back(SessionEvent::StateChanged { from, to });
    }

    /// Restarts inactivity tracking from `at`.
    fn reset_idle(&mut self, at: Millis) {
        self.timers.cancel(TimerKind::IdleReveal);
        self.timers.cancel(TimerKind::IdleHide);
        self.idle_epoch += 1;
        if !self.revealed.is_empty() {
            self.revealed.clear();
            self.events.push_back(SessionEvent::HintHidden);
        }
        self.timers
            .schedule(TimerKind::IdleReveal, at + self.timings.idle, self.idle_epoch);
    }

    fn advance_to(&mut self, now: Millis) {
        while let Some(timer) = self.timers.pop_due(now) {
            self.fire(timer);
        }
    }

    fn fire(&mut self, timer: Timer) {
        use TimerKind::*;

        let current = match timer.kind {
            Dwell | ClockTick => self.round_epoch,
            IdleReveal | IdleHide => self.idle_epoch,
        };
        if timer.epoch != current {
            log::trace!("Dropping stale {:?} from epoch {}", timer.kind, timer.epoch);
            return;
        }

        match (timer.kind, self.state) {
            (Dwell, SessionState::Showing) => {
                log::debug!("Dwell over at {}", timer.due);
                self.set_state(SessionState::Playing);
                self.timers.schedule(
                    ClockTick,
                    timer.due + self.timings.clock_period,
                    self.round_epoch,
                );
                self.reset_idle(timer.due);
            }
            (ClockTick, SessionState::Playing) => {
                self.elapsed = timer.due - self.started_at;
                self.timers.schedule(
                    ClockTick,
                    timer.due + self.timings.clock_period,
                    self.round_epoch,
                );
            }
            (IdleReveal, SessionState::Playing) => {
                let Some(board) = self.board.as_ref() else {
                    return;
                };
                self.revealed = board
                    .labels_near(self.player, self.timings.hint_radius)
                    .collect();
                self.hint_disclosed = true;
                log::debug!("Idle at {:?}, peeking {:?}", self.player, self.revealed);
                let labels = self.revealed.iter().copied().collect();
                self.events.push_back(SessionEvent::HintRevealed(labels));
                self.timers
                    .schedule(IdleHide, timer.due + self.timings.reveal, self.idle_epoch);
            }
            (IdleHide, SessionState::Playing) => {
                self.revealed.clear();
                self.events.push_back(SessionEvent::HintHidden);
            }
            (kind, state) => {
                log::trace!("Dropping {:?} fired while {:?}", kind, state);
            }
        }
    }
}
