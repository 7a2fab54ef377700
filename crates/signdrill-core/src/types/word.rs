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

/// The externally assigned identifier of a word. It is stable across
/// imports: a re-import matches words by this id, never by their text.
pub type WordId = i64;

/// Difficulty tier of a word.
pub type Level = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Word {
    pub id: WordId,
    pub level: Level,
    pub text: String,
}

impl Word {
    pub fn new(id: WordId, level: Level, text: impl Into<String>) -> Self {
        Self {
            id,
            level,
            text: text.into(),
        }
    }
}
