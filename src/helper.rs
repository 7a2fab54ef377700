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

use std::fs::write;
use std::path::Path;
use std::path::PathBuf;

use signdrill_core::Fallible;
use signdrill_core::Word;

use crate::db::Database;
use crate::db::StoreConfig;

pub const SAMPLE_CSV: &str = "\u{feff}Number,Level,Word\n\
1,1,HELLO\n\
2,1,THANK YOU\n\
3,2,MOTHER\n\
4,2,FATHER\n\
7,3,OLD\n";

pub fn sample_words() -> Vec<Word> {
    vec![
        Word::new(1, 1, "HELLO"),
        Word::new(2, 1, "THANK YOU"),
        Word::new(3, 2, "MOTHER"),
        Word::new(4, 2, "FATHER"),
        Word::new(7, 3, "OLD"),
    ]
}

/// An in-memory store holding the sample words.
pub fn sample_db() -> Fallible<Database> {
    let mut db = Database::open_in_memory(StoreConfig::default())?;
    db.replace_words(&sample_words())?;
    Ok(db)
}

pub fn write_csv(dir: &Path, name: &str, contents: &str) -> Fallible<PathBuf> {
    let path = dir.join(name);
    write(&path, contents)?;
    Ok(path)
}
