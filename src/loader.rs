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

use std::path::Path;

use signdrill_core::Fallible;
use signdrill_core::SyncReport;
use signdrill_core::read_catalog;

use crate::db::Database;

/// Replaces the whole store with the words in `source`. The source is read
/// and validated before anything is dropped, so a bad file leaves the store
/// as it was.
pub fn replace_catalog(db: &mut Database, source: &Path) -> Fallible<usize> {
    let words = read_catalog(source)?;
    log::warn!(
        "Erasing all sessions and scores and reloading the catalog from {}",
        source.display()
    );
    db.replace_words(&words)
}

/// Brings the catalog in line with `source`, keeping all session history.
pub fn sync_catalog(db: &mut Database, source: &Path) -> Fallible<SyncReport> {
    let words = read_catalog(source)?;
    log::debug!("Read {} records from {}", words.len(), source.display());
    db.sync_words(&words)
}
