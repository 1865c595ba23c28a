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

//! The game layer: players and agents, the state descriptor, the
//! transformation stacks and the controller that ties them into a
//! navigable timeline, plus the snapshot codec.

mod agent;
mod controller;
mod player;
mod snapshot;
mod state;
mod transform;

pub use agent::*;
pub use controller::*;
pub use player::*;
pub use state::*;
pub use transform::*;
