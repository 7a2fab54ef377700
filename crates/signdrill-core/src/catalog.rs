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

//! Reading the word list that seeds the catalog.
//!
//! The source is a CSV file with the header columns `Number`, `Level` and
//! `Word`. Spreadsheet exports often start with a UTF-8 byte-order mark,
//! which is skipped.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error as _;
use serde::Serialize;

use crate::error::DrillError;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::word::Level;
use crate::types::word::Word;
use crate::types::word::WordId;

const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Number", deserialize_with = "trimmed_integer")]
    number: WordId,
    #[serde(rename = "Level", deserialize_with = "trimmed_integer")]
    level: Level,
    /// Kept exactly as written, surrounding spaces included.
    #[serde(rename = "Word")]
    word: String,
}

fn trimmed_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.trim()
        .parse()
        .map_err(|_| D::Error::custom(format!("'{text}' is not an integer")))
}

/// Reads every word from the CSV file at `path`.
pub fn read_catalog(path: &Path) -> Fallible<Vec<Word>> {
    let text = match read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DrillError::MissingSourceFile {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };
    parse_catalog(&text)
}

/// Parses CSV text into words, in source order. Columns past the known ones
/// are ignored. Any bad record fails the whole parse.
pub fn parse_catalog(text: &str) -> Fallible<Vec<Word>> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| malformed(1, e))?.clone();
    let mut words = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|pos| pos.line()).unwrap_or(0);
            malformed(line, e)
        })?;
        let line = record.position().map(|pos| pos.line()).unwrap_or(0);
        let row: CatalogRow = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(line, e))?;
        words.push(Word::new(row.number, row.level, row.word));
    }
    Ok(words)
}

fn malformed(line: u64, err: csv::Error) -> ErrorReport {
    let message = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    };
    DrillError::MalformedRecord { line, message }.into()
}

/// Counters produced by a catalog synchronization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Records read from the source.
    pub checked: usize,
    /// Existing words whose text changed.
    pub updated: usize,
    /// Words that were not in the store before.
    pub added: usize,
}

impl Display for SyncReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Checked {} records, updated {} and added {}.",
            self.checked, self.updated, self.added
        )
    }
}
