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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::PathBuf;

use crate::types::session::SessionId;
use crate::types::word::WordId;

/// The failures the drill itself can produce, as opposed to I/O or storage
/// failures, which only carry a message.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillError {
    /// The catalog source file does not exist or cannot be opened.
    MissingSourceFile { path: PathBuf },
    /// A catalog record is missing a field or has an unparseable one.
    MalformedRecord { line: u64, message: String },
    /// There are no words to sample from.
    EmptyCatalog,
    /// Every word has already been asked in a without-replacement drill.
    CatalogExhausted,
    /// The session has no recorded attempts, so its accuracy is undefined.
    NoAttempts { session_id: SessionId },
    UnknownSession { session_id: SessionId },
    UnknownWord { word_id: WordId },
}

impl Display for DrillError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DrillError::MissingSourceFile { path } => {
                write!(f, "word list not found: {}", path.display())
            }
            DrillError::MalformedRecord { line, message } => {
                write!(f, "malformed record on line {line}: {message}")
            }
            DrillError::EmptyCatalog => write!(f, "the word catalog is empty"),
            DrillError::CatalogExhausted => {
                write!(f, "every word in the catalog has already been asked")
            }
            DrillError::NoAttempts { session_id } => {
                write!(f, "session {session_id} has no recorded attempts")
            }
            DrillError::UnknownSession { session_id } => {
                write!(f, "session {session_id} does not exist")
            }
            DrillError::UnknownWord { word_id } => write!(f, "word {word_id} does not exist"),
        }
    }
}

impl Error for DrillError {}

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
    kind: Option<DrillError>,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
            kind: None,
        }
    }

    /// The drill failure behind this report, if it came from one.
    pub fn kind(&self) -> Option<&DrillError> {
        self.kind.as_ref()
    }
}

impl From<DrillError> for ErrorReport {
    fn from(value: DrillError) -> Self {
        ErrorReport {
            message: value.to_string(),
            kind: Some(value),
        }
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport::new(format!("I/O error: {value:#?}"))
    }
}

impl From<csv::Error> for ErrorReport {
    fn from(value: csv::Error) -> Self {
        ErrorReport::new(format!("CSV error: {value}"))
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport::new(format!("JSON error: {value:#?}"))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for ErrorReport {
    fn from(value: rusqlite::Error) -> Self {
        ErrorReport::new(format!("database error: {value}"))
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport::new(msg))
}
