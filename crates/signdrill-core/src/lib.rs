// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! signdrill-core: storage-independent pieces of the signdrill word drill.
//!
//! - Reading the CSV word list
//! - Word, session and score types
//! - Accuracy tallies and session reports
//! - A small seeded PRNG for sampling words

pub mod catalog;
pub mod error;
pub mod rng;
pub mod types;

pub use catalog::{SyncReport, parse_catalog, read_catalog};
pub use error::{DrillError, ErrorReport, Fallible, fail};
pub use rng::TinyRng;
pub use types::session::{MissedWord, Session, SessionId, SessionReport, Tally};
pub use types::timestamp::Timestamp;
pub use types::word::{Level, Word, WordId};
