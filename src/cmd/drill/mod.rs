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

use std::io::BufRead;
use std::io::Write;

use signdrill_core::DrillError;
use signdrill_core::Fallible;
use signdrill_core::SessionId;
use signdrill_core::TinyRng;

use crate::db::Database;
use crate::sampler::SamplingMode;
use crate::sampler::WordSampler;

pub struct DrillConfig {
    /// How many questions to ask.
    pub questions: usize,
    pub sampling: SamplingMode,
    /// Fixed PRNG seed. The clock is used when absent.
    pub seed: Option<u64>,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            questions: 5,
            sampling: SamplingMode::WithReplacement,
            seed: None,
        }
    }
}

/// Runs one drill session: asks up to `config.questions` words on `output`,
/// reads y/n answers from `input`, records every answer, and prints the
/// session's score and missed words. Returns the new session's id.
pub fn run_drill<R: BufRead, W: Write>(
    db: &Database,
    config: &DrillConfig,
    input: &mut R,
    output: &mut W,
) -> Fallible<SessionId> {
    if db.word_count()? == 0 {
        return Err(DrillError::EmptyCatalog.into());
    }
    let rng = match config.seed {
        Some(seed) => TinyRng::from_seed(seed),
        None => TinyRng::from_clock(),
    };
    let mut sampler = WordSampler::new(rng, config.sampling);
    let session_id = db.new_session()?;
    log::debug!(
        "Drilling {} words in session {session_id} ({})",
        config.questions,
        config.sampling
    );

    for _ in 0..config.questions {
        let (word_id, word) = match sampler.next_word(db) {
            Ok(next) => next,
            Err(e) if e.kind() == Some(&DrillError::CatalogExhausted) => {
                writeln!(output, "Every word has been asked.")?;
                break;
            }
            Err(e) => return Err(e),
        };
        match ask(&word, input, output)? {
            Some(known) => db.score_word(session_id, word_id, known)?,
            None => break,
        }
    }

    print_summary(db, session_id, output)?;
    Ok(session_id)
}

/// Prompts until the answer is a yes or a no. `None` means the input ended.
fn ask<R: BufRead, W: Write>(word: &str, input: &mut R, output: &mut W) -> Fallible<Option<bool>> {
    loop {
        writeln!(output, "Do you know how to sign (y/n): '{word}'")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if let Some(answer) = parse_answer(&line) {
            return Ok(Some(answer));
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y') => Some(true),
        Some('n') => Some(false),
        _ => None,
    }
}

fn print_summary<W: Write>(db: &Database, session_id: SessionId, output: &mut W) -> Fallible<()> {
    let score = match db.get_session_score(session_id) {
        Ok(score) => score,
        Err(e) if matches!(e.kind(), Some(DrillError::NoAttempts { .. })) => {
            writeln!(output, "No words were scored this session.")?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    writeln!(output, "This session you got {:.1}% correct.", score * 100.0)?;
    let missed = db.get_incorrect_words(session_id)?;
    if missed.is_empty() {
        writeln!(output, "You knew every word.")?;
    } else {
        writeln!(output, "You should work on the following words:")?;
        for word in missed {
            writeln!(output, "\t{}. '{}'", word.word_id, word.text)?;
        }
    }
    Ok(())
}
