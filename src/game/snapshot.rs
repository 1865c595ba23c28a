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

//! Snapshot codec: the wire shape of a game and the validation that makes
//! decoded snapshots safe to replay. Identifiers are preserved exactly, so
//! every transformation in a decoded game resolves against the decoded
//! board.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::board::{
    Board, Chessman, ChessmanId, Color, Material, Move, MoveKind, Piece, Square,
};
use crate::errors::ChessError;

use super::controller::Game;
use super::player::Player;
use super::state::{GameState, StateKind};
use super::transform::Transformation;

#[derive(Serialize, Deserialize)]
struct GameSnapshot {
    name: String,
    state: GameState,
    board: BoardSnapshot,
    white_player: Player,
    black_player: Player,
    history: Vec<TransformationSnapshot>,
    future: Vec<TransformationSnapshot>,
    read_only: bool,
}

#[derive(Serialize, Deserialize)]
struct BoardSnapshot {
    active: Vec<ChessmanSnapshot>,
    captured: Vec<ChessmanSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct ChessmanSnapshot {
    color: Color,
    kind: Piece,
    position: String,
    id: ChessmanId,
    move_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    en_passant: Option<bool>,
}

#[derive(Serialize, Deserialize)]
struct TransformationSnapshot {
    timestamp: i64,
    #[serde(rename = "move")]
    mv: MoveSnapshot,
    state_kind: StateKind,
}

#[derive(Serialize, Deserialize)]
struct MoveSnapshot {
    color: Color,
    kind: MoveKind,
    from: String,
    to: String,
    piece_id: ChessmanId,
    will_check_opponent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    captured_piece_id: Option<ChessmanId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rook_sub_move: Option<SubMoveSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct SubMoveSnapshot {
    piece_id: ChessmanId,
    from: String,
    to: String,
}

impl Game {
    /// Encodes the game as a JSON snapshot.
    pub fn encode(&self) -> Result<String> {
        let snapshot = GameSnapshot {
            name: self.name().to_string(),
            state: *self.state(),
            board: encode_board(self.board()),
            white_player: self.white().clone(),
            black_player: self.black().clone(),
            history: self
                .history()
                .iter()
                .map(|t| encode_transformation(t, self.board()))
                .collect::<Result<_>>()?,
            future: self
                .future()
                .iter()
                .map(|t| encode_transformation(t, self.board()))
                .collect::<Result<_>>()?,
            read_only: self.is_read_only(),
        };
        serde_json::to_string(&snapshot).map_err(|err| ChessError::Format(err.to_string()).into())
    }

    /// Decodes a JSON snapshot back into a game. Fails with `Format` on
    /// malformed content, unresolved identifiers, or moves whose piece
    /// references contradict their color.
    pub fn decode(json: &str) -> Result<Game> {
        let snapshot: GameSnapshot =
            serde_json::from_str(json).map_err(|err| ChessError::Format(err.to_string()))?;
        if snapshot.state.round < 1 {
            return Err(ChessError::Format("round must be at least 1".into()).into());
        }
        if snapshot.white_player.color() != Color::White
            || snapshot.black_player.color() != Color::Black
        {
            return Err(ChessError::Format("players carry the wrong colors".into()).into());
        }
        let board = decode_board(snapshot.board)?;
        let history = snapshot
            .history
            .into_iter()
            .map(|t| decode_transformation(t, &board))
            .collect::<Result<_>>()?;
        let future = snapshot
            .future
            .into_iter()
            .map(|t| decode_transformation(t, &board))
            .collect::<Result<_>>()?;
        Ok(Game::from_parts(
            snapshot.name,
            board,
            snapshot.state,
            snapshot.white_player,
            snapshot.black_player,
            history,
            future,
            snapshot.read_only,
        ))
    }
}

fn encode_board(board: &Board) -> BoardSnapshot {
    BoardSnapshot {
        active: board.active_pieces().map(encode_chessman).collect(),
        captured: board.captured_pieces().map(encode_chessman).collect(),
    }
}

fn encode_chessman(man: &Chessman) -> ChessmanSnapshot {
    ChessmanSnapshot {
        color: man.color(),
        kind: man.piece(),
        position: man.square().notation(),
        id: man.id(),
        move_count: man.move_count(),
        en_passant: man.piece().is_pawn().then_some(man.en_passant()),
    }
}

fn encode_transformation(t: &Transformation, board: &Board) -> Result<TransformationSnapshot> {
    Ok(TransformationSnapshot {
        timestamp: t.timestamp_ms(),
        mv: encode_move(t.moved(), board)?,
        state_kind: t.state_kind(),
    })
}

fn encode_move(mv: &Move, board: &Board) -> Result<MoveSnapshot> {
    let color = board
        .piece_with(mv.piece_id())
        .map(Chessman::color)
        .ok_or_else(|| {
            ChessError::Format(format!("move references unknown chessman {}", mv.piece_id()))
        })?;
    let rook_sub_move = match mv {
        Move::Castling {
            rook_id,
            rook_from,
            rook_to,
            ..
        } => Some(SubMoveSnapshot {
            piece_id: *rook_id,
            from: rook_from.notation(),
            to: rook_to.notation(),
        }),
        _ => None,
    };
    Ok(MoveSnapshot {
        color,
        kind: mv.kind(),
        from: mv.from().notation(),
        to: mv.to().notation(),
        piece_id: mv.piece_id(),
        will_check_opponent: mv.will_check_opponent(),
        captured_piece_id: mv.captured_id(),
        rook_sub_move,
    })
}

fn decode_board(snapshot: BoardSnapshot) -> Result<Board> {
    let active = snapshot
        .active
        .into_iter()
        .map(decode_chessman)
        .collect::<Result<Vec<_>>>()?;
    let captured = snapshot
        .captured
        .into_iter()
        .map(decode_chessman)
        .collect::<Result<Vec<_>>>()?;

    let mut squares = HashSet::new();
    for man in &active {
        if !squares.insert(man.square()) {
            return Err(
                ChessError::Format(format!("two chessmen occupy {}", man.square())).into(),
            );
        }
    }
    let mut ids = HashSet::new();
    for man in active.iter().chain(captured.iter()) {
        if !ids.insert(man.id()) {
            return Err(ChessError::Format(format!("duplicate identifier {}", man.id())).into());
        }
    }
    Ok(Board::from_collections(active, captured))
}

fn decode_chessman(snapshot: ChessmanSnapshot) -> Result<Chessman> {
    let square = Square::at(&snapshot.position)?;
    Ok(Chessman::with_id(
        snapshot.id,
        Material::new(snapshot.color, snapshot.kind),
        square,
        snapshot.move_count,
        snapshot.en_passant.unwrap_or(false),
    ))
}

fn decode_transformation(snapshot: TransformationSnapshot, board: &Board) -> Result<Transformation> {
    Ok(Transformation::with_timestamp(
        snapshot.timestamp,
        decode_move(snapshot.mv, board)?,
        snapshot.state_kind,
    ))
}

fn decode_move(snapshot: MoveSnapshot, board: &Board) -> Result<Move> {
    let piece = board.piece_with(snapshot.piece_id).ok_or_else(|| {
        ChessError::Format(format!("unresolved chessman {}", snapshot.piece_id))
    })?;
    if piece.color() != snapshot.color {
        return Err(ChessError::Format(format!(
            "a {} move cannot be made by {}'s chessman",
            snapshot.color,
            piece.color()
        ))
        .into());
    }
    let from = Square::at(&snapshot.from)?;
    let to = Square::at(&snapshot.to)?;
    let will_check_opponent = snapshot.will_check_opponent;

    let captured_id = |snapshot: &MoveSnapshot| -> Result<ChessmanId> {
        let id = snapshot.captured_piece_id.ok_or_else(|| {
            ChessError::Format(format!("{} move lacks a captured piece", snapshot.kind))
        })?;
        let captured = board
            .piece_with(id)
            .ok_or_else(|| ChessError::Format(format!("unresolved captured chessman {id}")))?;
        if captured.color() != snapshot.color.opposite() {
            return Err(ChessError::Format(format!(
                "a {} move cannot capture an allied chessman",
                snapshot.color
            ))
            .into());
        }
        Ok(id)
    };

    match snapshot.kind {
        MoveKind::RegularMove => Ok(Move::Regular {
            piece_id: snapshot.piece_id,
            from,
            to,
            will_check_opponent,
        }),
        MoveKind::TwoSquareAdvance => Ok(Move::TwoSquareAdvance {
            piece_id: snapshot.piece_id,
            from,
            to,
            will_check_opponent,
        }),
        MoveKind::Capture => Ok(Move::Capture {
            piece_id: snapshot.piece_id,
            from,
            to,
            captured_id: captured_id(&snapshot)?,
            will_check_opponent,
        }),
        MoveKind::EnPassantCapture => Ok(Move::EnPassant {
            piece_id: snapshot.piece_id,
            from,
            to,
            captured_id: captured_id(&snapshot)?,
            will_check_opponent,
        }),
        MoveKind::Castling => {
            let sub = snapshot.rook_sub_move.as_ref().ok_or_else(|| {
                ChessError::Format("castling lacks its rook sub-move".into())
            })?;
            let rook = board.piece_with(sub.piece_id).ok_or_else(|| {
                ChessError::Format(format!("unresolved rook {}", sub.piece_id))
            })?;
            if rook.color() != snapshot.color {
                return Err(ChessError::Format(
                    "castling references an enemy rook".into(),
                )
                .into());
            }
            Ok(Move::Castling {
                king_id: snapshot.piece_id,
                king_from: from,
                king_to: to,
                rook_id: sub.piece_id,
                rook_from: Square::at(&sub.from)?,
                rook_to: Square::at(&sub.to)?,
                will_check_opponent,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlayerMove;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn played_game() -> Game {
        let mut game = Game::new(
            "round trip",
            Player::human("W", Color::White),
            Player::human("B", Color::Black),
        )
        .unwrap();
        for (from, to) in [
            ("e2", "e4"),
            ("d7", "d5"),
            ("e4", "d5"), // capture
            ("d8", "d5"), // recapture
            ("g1", "f3"),
        ] {
            let color = game.to_move();
            game.register_move(PlayerMove::new(
                Square::at(from).unwrap(),
                Square::at(to).unwrap(),
                color,
            ))
            .unwrap();
            game.next_turn().unwrap();
        }
        game.backward(1).unwrap(); // leave something in the future stack
        game
    }

    fn fingerprint(board: &Board) -> Vec<(ChessmanId, Square, u32, bool, bool)> {
        let mut all: Vec<_> = board
            .active_pieces()
            .map(|man| (man.id(), man.square(), man.move_count(), man.en_passant(), true))
            .chain(board.captured_pieces().map(|man| {
                (man.id(), man.square(), man.move_count(), man.en_passant(), false)
            }))
            .collect();
        all.sort_by_key(|entry| format!("{}", entry.0));
        all
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let game = played_game();
        let encoded = game.encode().unwrap();
        let decoded = Game::decode(&encoded).unwrap();

        assert_eq!(decoded.name(), game.name());
        assert_eq!(decoded.state(), game.state());
        assert_eq!(decoded.is_read_only(), game.is_read_only());
        assert_eq!(fingerprint(decoded.board()), fingerprint(game.board()));
        assert_eq!(decoded.history(), game.history());
        assert_eq!(decoded.future(), game.future());
        assert_eq!(decoded.white().name(), "W");
        assert_eq!(decoded.white().score(), game.white().score());
        assert_eq!(decoded.black().score(), game.black().score());
        assert_eq!(decoded.to_move(), game.to_move());
    }

    #[test]
    fn test_decoded_game_keeps_playing() {
        let game = played_game();
        let encoded = game.encode().unwrap();
        let mut decoded = Game::decode(&encoded).unwrap();

        // the future stack survives: redo the rewound knight move
        decoded.forward(1).unwrap();
        let f3 = Square::at("f3").unwrap();
        assert_eq!(decoded.board().piece_at(f3).unwrap().piece(), Piece::Knight);

        // and the timeline rewinds all the way down
        decoded.reset().unwrap();
        assert_eq!(decoded.history().len(), 0);
        assert_eq!(decoded.board().captured_pieces().count(), 0);
    }

    #[test]
    fn test_snapshot_shape() {
        let game = played_game();
        let value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        assert!(value["name"].is_string());
        assert_eq!(value["state"]["kind"], "Regular");
        assert!(value["board"]["active"].is_array());
        assert!(value["board"]["captured"].is_array());
        assert_eq!(value["white_player"]["kind"], "Human");
        assert!(value["history"].is_array());
        assert_eq!(value["read_only"], false);

        let first = &value["history"][0];
        assert!(first["timestamp"].is_i64());
        assert_eq!(first["move"]["kind"], "TwoSquareAdvance");
        assert_eq!(first["move"]["from"], "e2");
        assert_eq!(first["move"]["to"], "e4");
        assert_eq!(first["state_kind"], "Regular");

        // pawns carry their en-passant flag, other kinds do not
        let pawn = value["board"]["active"]
            .as_array()
            .unwrap()
            .iter()
            .find(|man| man["kind"] == "Pawn")
            .unwrap();
        assert!(pawn["en_passant"].is_boolean());
        let knight = value["board"]["active"]
            .as_array()
            .unwrap()
            .iter()
            .find(|man| man["kind"] == "Knight")
            .unwrap();
        assert!(knight.get("en_passant").is_none());
    }

    fn expect_format(json: String) {
        let err = Game::decode(&json).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<ChessError>(),
                Some(ChessError::Format(_))
            ),
            "expected Format, got: {err}"
        );
    }

    #[test]
    fn test_decode_rejects_allied_capture_reference() {
        let game = played_game();
        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        // point the capture at the capturing pawn itself
        let capture = value["history"]
            .as_array_mut()
            .unwrap()
            .iter_mut()
            .find(|t| t["move"]["kind"] == "Capture")
            .unwrap();
        capture["move"]["captured_piece_id"] = capture["move"]["piece_id"].clone();
        expect_format(value.to_string());
    }

    #[test]
    fn test_decode_rejects_opponent_piece_reference() {
        let game = played_game();
        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        // White's first move now claims a black chessman
        let black_pawn_id = value["board"]["active"]
            .as_array()
            .unwrap()
            .iter()
            .find(|man| man["kind"] == "Pawn" && man["color"] == "Black")
            .unwrap()["id"]
            .clone();
        value["history"][0]["move"]["piece_id"] = black_pawn_id;
        expect_format(value.to_string());
    }

    #[test]
    fn test_decode_rejects_unresolved_identifier() {
        let game = played_game();
        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        value["history"][0]["move"]["piece_id"] =
            Value::String("00000000-0000-4000-8000-000000000000".into());
        expect_format(value.to_string());
    }

    #[test]
    fn test_decode_rejects_unknown_kinds_and_bad_squares() {
        let game = played_game();

        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        value["history"][0]["move"]["kind"] = Value::String("Teleport".into());
        expect_format(value.to_string());

        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        value["board"]["active"][0]["position"] = Value::String("z9".into());
        expect_format(value.to_string());

        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        value["state"]["kind"] = Value::String("Adjourned".into());
        expect_format(value.to_string());
    }

    #[test]
    fn test_decode_rejects_duplicate_squares() {
        let game = played_game();
        let mut value: Value = serde_json::from_str(&game.encode().unwrap()).unwrap();
        let squatter = value["board"]["active"][0]["position"].clone();
        value["board"]["active"][1]["position"] = squatter;
        expect_format(value.to_string());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        expect_format("not json at all".into());
        expect_format("{}".into());
    }
}
