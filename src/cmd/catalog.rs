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

use std::io::Write;
use std::path::Path;

use signdrill_core::Fallible;

use crate::db::Database;
use crate::loader::replace_catalog;
use crate::loader::sync_catalog;

pub fn import_words<W: Write>(db: &mut Database, source: &Path, output: &mut W) -> Fallible<()> {
    let loaded = replace_catalog(db, source)?;
    writeln!(output, "Loaded {loaded} words from {}.", source.display())?;
    Ok(())
}

pub fn sync_words<W: Write>(db: &mut Database, source: &Path, output: &mut W) -> Fallible<()> {
    let report = sync_catalog(db, source)?;
    writeln!(output, "{report}")?;
    Ok(())
}
