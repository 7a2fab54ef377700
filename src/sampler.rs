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

use std::collections::HashSet;
use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use signdrill_core::DrillError;
use signdrill_core::Fallible;
use signdrill_core::TinyRng;
use signdrill_core::WordId;

use crate::db::Database;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum SamplingMode {
    /// Every question is drawn from the whole catalog; words may repeat.
    WithReplacement,
    /// A word is asked at most once per drill.
    WithoutReplacement,
}

impl Display for SamplingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingMode::WithReplacement => write!(f, "with-replacement"),
            SamplingMode::WithoutReplacement => write!(f, "without-replacement"),
        }
    }
}

/// Draws the words of one drill.
pub struct WordSampler {
    rng: TinyRng,
    mode: SamplingMode,
    asked: HashSet<WordId>,
}

impl WordSampler {
    pub fn new(rng: TinyRng, mode: SamplingMode) -> Self {
        Self {
            rng,
            mode,
            asked: HashSet::new(),
        }
    }

    pub fn next_word(&mut self, db: &Database) -> Fallible<(WordId, String)> {
        match self.mode {
            SamplingMode::WithReplacement => db.get_random_word(&mut self.rng),
            SamplingMode::WithoutReplacement => {
                let remaining: Vec<_> = db
                    .words()?
                    .into_iter()
                    .filter(|w| !self.asked.contains(&w.id))
                    .collect();
                if remaining.is_empty() && self.asked.is_empty() {
                    return Err(DrillError::EmptyCatalog.into());
                }
                let index = self
                    .rng
                    .below(remaining.len() as u64)
                    .ok_or(DrillError::CatalogExhausted)?;
                let word = &remaining[index as usize];
                self.asked.insert(word.id);
                Ok((word.id, word.text.clone()))
            }
        }
    }
}
