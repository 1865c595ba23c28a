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

use chrono::Utc;

use crate::board::Move;

use super::state::StateKind;

/// One row of the history/future stacks: a move, when it was performed, and
/// the state kind the game was in when it was chosen. Transformations move
/// wholesale between the two stacks as the timeline is navigated, so their
/// timestamps survive undo and redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    timestamp_ms: i64,
    mv: Move,
    state_kind: StateKind,
}

impl Transformation {
    pub fn new(mv: Move, state_kind: StateKind) -> Self {
        Self {
            timestamp_ms: Utc::now().timestamp_millis(),
            mv,
            state_kind,
        }
    }

    /// Rebuilds a transformation with a known timestamp, for snapshot
    /// decoding.
    pub fn with_timestamp(timestamp_ms: i64, mv: Move, state_kind: StateKind) -> Self {
        Self {
            timestamp_ms,
            mv,
            state_kind,
        }
    }

    #[inline]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    #[inline]
    pub fn moved(&self) -> &Move {
        &self.mv
    }

    #[inline]
    pub fn state_kind(&self) -> StateKind {
        self.state_kind
    }
}
