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

use thiserror::Error;

/// Errors surfaced at the core boundary.
///
/// `IllegalMove` and `IllegalOperation` are recoverable and expected to be
/// handled by the caller. `Format` only occurs at snapshot boundaries.
/// `InvalidArgument` and `NotFound` indicate misuse of a primitive or a
/// broken internal invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("format: {0}")]
    Format(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("illegal operation: {0}")]
    IllegalOperation(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
}
