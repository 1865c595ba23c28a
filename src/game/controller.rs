// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::board::{Board, Color, Move, PlayerMove};
use crate::errors::ChessError;

use super::player::Player;
use super::state::{GameState, StateKind};
use super::transform::Transformation;

/// The game controller: owns the board, both players and the two
/// transformation stacks that make the timeline navigable.
///
/// The color to move and the round are derived from the history depth, so
/// every point reached by `backward`/`forward` reports a consistent state.
/// `history.len() + future.len()` always equals the number of moves
/// performed across all reachable points of the timeline.
#[derive(Debug)]
pub struct Game {
    name: String,
    board: Board,
    state: GameState,
    white: Player,
    black: Player,
    history: Vec<Transformation>,
    future: Vec<Transformation>,
    read_only: bool,
    playing: bool,
    abort: Arc<AtomicBool>,
}

impl Game {
    pub fn new(name: impl Into<String>, white: Player, black: Player) -> Result<Self> {
        if white.color() != Color::White || black.color() != Color::Black {
            return Err(
                ChessError::InvalidArgument("players must carry their seat colors".into()).into(),
            );
        }
        Ok(Self {
            name: name.into(),
            board: Board::standard(),
            state: GameState::initial(),
            white,
            black,
            history: Vec::new(),
            future: Vec::new(),
            read_only: false,
            playing: true,
            abort: Arc::new(AtomicBool::new(false)),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        board: Board,
        state: GameState,
        white: Player,
        black: Player,
        history: Vec<Transformation>,
        future: Vec<Transformation>,
        read_only: bool,
    ) -> Self {
        Self {
            name,
            board,
            state,
            white,
            black,
            history,
            future,
            read_only,
            playing: true,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }
    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }
    #[inline]
    pub fn white(&self) -> &Player {
        &self.white
    }
    #[inline]
    pub fn black(&self) -> &Player {
        &self.black
    }
    #[inline]
    pub fn history(&self) -> &[Transformation] {
        &self.history
    }
    #[inline]
    pub fn future(&self) -> &[Transformation] {
        &self.future
    }
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    fn player_mut(&mut self, color: Color) -> &mut Player {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// The color whose turn it is, derived from the history depth.
    #[inline]
    pub fn to_move(&self) -> Color {
        if self.history.len() % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.to_move())
    }

    pub fn has_concluded(&self) -> bool {
        self.state.is_conclusive()
    }

    /// True while only backward/forward navigation is allowed.
    pub fn is_inspection_only(&self) -> bool {
        !self.playing || self.read_only
    }

    /// Shared flag the worker layer uses to interrupt an agent mid-search.
    /// `pause` raises it, `resume` lowers it.
    pub fn abort_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Buffers a raw move on the human player of its color, ahead of
    /// `next_turn`.
    pub fn register_move(&mut self, mv: PlayerMove) -> Result<()> {
        self.player_mut(mv.color).register(mv)
    }

    /// Plays out one half-move: asks the current player for a raw move,
    /// resolves it against the piece's legal moves, executes it, records the
    /// transformation and discards any redoable future.
    pub fn next_turn(&mut self) -> Result<&GameState> {
        if self.is_inspection_only() {
            return Err(
                ChessError::IllegalOperation("game is in inspection mode".into()).into(),
            );
        }
        if self.has_concluded() {
            return Err(ChessError::IllegalOperation("game has concluded".into()).into());
        }
        let color = self.to_move();
        let board_copy = self.board.clone();
        let abort = Arc::clone(&self.abort);
        let raw = self.player_mut(color).next_move(board_copy, &abort)?;
        if self.abort.load(Ordering::Relaxed) || !self.playing {
            return Err(ChessError::IllegalOperation("turn was cancelled".into()).into());
        }
        let mv = self.resolve(raw, color)?;
        debug!("{} plays {}", self.player(color).name(), mv);

        let pre_kind = self.state.kind;
        let delta = self.board.execute(&mv)?;
        self.player_mut(color).add_score(delta);
        self.history.push(Transformation::new(mv, pre_kind));
        self.future.clear();
        self.rearm_en_passant();
        self.refresh_state();
        Ok(&self.state)
    }

    fn resolve(&mut self, raw: PlayerMove, color: Color) -> Result<Move> {
        if raw.color != color {
            return Err(
                ChessError::IllegalMove(format!("it is not {}'s turn", raw.color)).into(),
            );
        }
        let man = self
            .board
            .piece_at(raw.from)
            .ok_or_else(|| ChessError::IllegalMove(format!("no chessman at {}", raw.from)))?;
        if man.color() != color {
            return Err(ChessError::IllegalMove(format!(
                "the chessman at {} belongs to the opponent",
                raw.from
            ))
            .into());
        }
        let id = man.id();
        self.board
            .legal_moves_of(id)?
            .into_iter()
            .find(|mv| mv.to() == raw.to)
            .ok_or_else(|| {
                ChessError::IllegalMove(format!(
                    "the chessman at {} cannot reach {}",
                    raw.from, raw.to
                ))
                .into()
            })
    }

    /// Smart undo: rewinds two half-moves when the opponent is an agent, so
    /// a human lands back on their own turn, and one otherwise. Permitted
    /// while playing for a human to move, or once the game has concluded.
    pub fn undo(&mut self) -> Result<()> {
        if self.is_inspection_only() {
            return Err(
                ChessError::IllegalOperation("game is in inspection mode".into()).into(),
            );
        }
        if !self.current_player().is_human() && !self.has_concluded() {
            return Err(
                ChessError::IllegalOperation("cannot undo on an agent's turn".into()).into(),
            );
        }
        let steps = self.smart_steps();
        if self.history.len() < steps {
            return Err(ChessError::IllegalOperation("not enough history to undo".into()).into());
        }
        self.backward(steps)
    }

    /// Smart redo, symmetric to [`Self::undo`].
    pub fn redo(&mut self) -> Result<()> {
        if self.is_inspection_only() {
            return Err(
                ChessError::IllegalOperation("game is in inspection mode".into()).into(),
            );
        }
        if self.has_concluded() {
            return Err(ChessError::IllegalOperation("game has concluded".into()).into());
        }
        if !self.current_player().is_human() {
            return Err(
                ChessError::IllegalOperation("cannot redo on an agent's turn".into()).into(),
            );
        }
        let steps = self.smart_steps();
        if self.future.len() < steps {
            return Err(ChessError::IllegalOperation("not enough future to redo".into()).into());
        }
        self.forward(steps)
    }

    fn smart_steps(&self) -> usize {
        if self.player(!self.to_move()).is_agent() {
            2
        } else {
            1
        }
    }

    /// Unconditional backward navigation by `n` half-moves. Available even
    /// while paused or read-only.
    pub fn backward(&mut self, n: usize) -> Result<()> {
        if self.history.len() < n {
            return Err(ChessError::IllegalOperation(format!(
                "cannot step back {n}: only {} in history",
                self.history.len()
            ))
            .into());
        }
        for _ in 0..n {
            self.step_back()?;
        }
        Ok(())
    }

    /// Unconditional forward navigation by `n` half-moves.
    pub fn forward(&mut self, n: usize) -> Result<()> {
        if self.future.len() < n {
            return Err(ChessError::IllegalOperation(format!(
                "cannot step forward {n}: only {} in future",
                self.future.len()
            ))
            .into());
        }
        for _ in 0..n {
            self.step_forward()?;
        }
        Ok(())
    }

    fn step_back(&mut self) -> Result<()> {
        let transformation = self
            .history
            .pop()
            .ok_or_else(|| ChessError::IllegalOperation("no move to undo".into()))?;
        let delta = self.board.undo(transformation.moved())?;
        if let Some(mover) = self
            .board
            .piece_with(transformation.moved().piece_id())
            .map(|man| man.color())
        {
            self.player_mut(mover).sub_score(delta);
        }
        self.future.push(transformation);
        self.rearm_en_passant();
        self.refresh_state();
        Ok(())
    }

    fn step_forward(&mut self) -> Result<()> {
        let transformation = self
            .future
            .pop()
            .ok_or_else(|| ChessError::IllegalOperation("no move to redo".into()))?;
        let delta = self.board.execute(transformation.moved())?;
        if let Some(mover) = self
            .board
            .piece_with(transformation.moved().piece_id())
            .map(|man| man.color())
        {
            self.player_mut(mover).add_score(delta);
        }
        self.history.push(transformation);
        self.rearm_en_passant();
        self.refresh_state();
        Ok(())
    }

    /// Pauses play: `next_turn`, `undo` and `redo` are disabled while
    /// navigation stays available, and any thinking agent is interrupted.
    pub fn pause(&mut self) {
        self.playing = false;
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn resume(&mut self) {
        self.playing = true;
        self.abort.store(false, Ordering::Relaxed);
    }

    /// Locks out every mutating operation except backward/forward
    /// navigation.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Rewinds to the initial position and forgets the timeline.
    pub fn reset(&mut self) -> Result<()> {
        while !self.history.is_empty() {
            self.step_back()?;
        }
        self.future.clear();
        Ok(())
    }

    /// Records a draw by agreement. Only the player to move can call it,
    /// and only a human.
    pub fn mark_draw(&mut self) -> Result<()> {
        if self.is_inspection_only() {
            return Err(
                ChessError::IllegalOperation("game is in inspection mode".into()).into(),
            );
        }
        if self.has_concluded() {
            return Err(ChessError::IllegalOperation("game has concluded".into()).into());
        }
        if !self.current_player().is_human() {
            return Err(
                ChessError::IllegalOperation("only a human may agree to a draw".into()).into(),
            );
        }
        self.state.kind = StateKind::AgreedDrawn;
        Ok(())
    }

    /// Every pawn's en-passant window closes after each timeline step; only
    /// the pawn that made the two-square advance now on top of the history
    /// is vulnerable. Captured pawns keep their flags so uncapturing
    /// restores them exactly.
    fn rearm_en_passant(&mut self) {
        self.board.disarm_en_passant();
        if let Some(top) = self.history.last() {
            if let Move::TwoSquareAdvance { piece_id, .. } = top.moved() {
                let piece_id = *piece_id;
                if let Some(man) = self.board.man_mut(piece_id) {
                    man.set_en_passant(true);
                }
            }
        }
    }

    fn refresh_state(&mut self) {
        let subject = self.to_move();
        let moves_played = self.history.len() as u32;
        let mut state = GameState::derive(&mut self.board, subject, 1 + moves_played / 2);
        // a conclusive transition closes the round instead of opening a new
        // one, so a mate delivered by Black reports the round it was played
        if state.is_conclusive() && moves_played > 0 && moves_played % 2 == 0 {
            state.round = moves_played / 2;
        }
        self.state = state;
    }
}
