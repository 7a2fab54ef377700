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

use serde::Serialize;

use crate::types::timestamp::Timestamp;
use crate::types::word::WordId;

/// Store-assigned identifier of a drill session. Strictly increasing.
pub type SessionId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub id: SessionId,
    pub created_at: Timestamp,
}

/// Right and total attempt counts for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub correct: u64,
    pub total: u64,
}

impl Tally {
    /// The fraction of attempts answered correctly, in `[0.0, 1.0]`. Undefined
    /// (`None`) when nothing was attempted.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.correct as f64 / self.total as f64)
        }
    }
}

/// A word answered incorrectly during a session. One per incorrect attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissedWord {
    pub word_id: WordId,
    pub text: String,
}

/// Everything the `stats` command shows about a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionReport {
    pub session: Session,
    pub tally: Tally,
    pub accuracy: Option<f64>,
    pub missed: Vec<MissedWord>,
}

impl SessionReport {
    pub fn new(session: Session, tally: Tally, missed: Vec<MissedWord>) -> Self {
        Self {
            session,
            tally,
            accuracy: tally.accuracy(),
            missed,
        }
    }
}
