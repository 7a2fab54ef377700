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

use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use clap::ValueEnum;
use signdrill_core::Fallible;
use signdrill_core::SessionId;
use signdrill_core::SessionReport;
use signdrill_core::fail;

use crate::db::Database;

#[derive(ValueEnum, Clone, Copy, PartialEq)]
pub enum StatsFormat {
    Text,
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

/// Prints the report of `session`, or of the most recent session.
pub fn print_stats<W: Write>(
    db: &Database,
    session: Option<SessionId>,
    format: StatsFormat,
    output: &mut W,
) -> Fallible<()> {
    let session_id = match session {
        Some(id) => id,
        None => match db.latest_session()? {
            Some(latest) => latest.id,
            None => return fail("no sessions have been recorded yet."),
        },
    };
    let report = db.session_report(session_id)?;
    match format {
        StatsFormat::Text => write_text(&report, output)?,
        StatsFormat::Json => {
            serde_json::to_writer_pretty(&mut *output, &report)?;
            writeln!(output)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(report: &SessionReport, output: &mut W) -> Fallible<()> {
    writeln!(
        output,
        "Session {} started {}",
        report.session.id, report.session.created_at
    )?;
    match report.accuracy {
        Some(accuracy) => writeln!(
            output,
            "Correct: {} of {} ({:.1}%)",
            report.tally.correct,
            report.tally.total,
            accuracy * 100.0
        )?,
        None => writeln!(output, "No attempts recorded.")?,
    }
    if !report.missed.is_empty() {
        writeln!(output, "Missed:")?;
        for word in &report.missed {
            writeln!(output, "\t{}. '{}'", word.word_id, word.text)?;
        }
    }
    Ok(())
}

/// Prints one line per session: id, start time and score.
pub fn list_sessions<W: Write>(db: &Database, output: &mut W) -> Fallible<()> {
    let sessions = db.sessions()?;
    if sessions.is_empty() {
        writeln!(output, "No sessions recorded.")?;
        return Ok(());
    }
    for session in sessions {
        let tally = db.session_tally(session.id)?;
        writeln!(
            output,
            "{}\t{}\t{}/{}",
            session.id, session.created_at, tally.correct, tally.total
        )?;
    }
    Ok(())
}
