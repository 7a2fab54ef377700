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

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;
use signdrill_core::DrillError;
use signdrill_core::Fallible;
use signdrill_core::MissedWord;
use signdrill_core::Session;
use signdrill_core::SessionId;
use signdrill_core::SessionReport;
use signdrill_core::SyncReport;
use signdrill_core::Tally;
use signdrill_core::Timestamp;
use signdrill_core::TinyRng;
use signdrill_core::Word;
use signdrill_core::WordId;

const SCHEMA: &str = "
    create table if not exists words (
        id integer primary key,
        level integer not null,
        text text not null
    );

    create table if not exists sessions (
        id integer primary key autoincrement,
        created_at text not null
    );

    create table if not exists scores (
        session_id integer not null references sessions (id),
        word_id integer not null references words (id),
        correct integer not null check (correct in (0, 1))
    );

    create index if not exists scores_by_session on scores (session_id);
";

const DROP_TABLES: &str = "
    drop table if exists scores;
    drop table if exists sessions;
    drop table if exists words;
";

#[derive(Clone, Copy, Debug)]
pub struct StoreConfig {
    /// Reject scores that point at a session or word that does not exist.
    /// When off, such scores are stored as-is.
    pub enforce_references: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enforce_references: true,
        }
    }
}

/// The SQLite store holding the catalog, the sessions and their scores.
pub struct Database {
    conn: Connection,
    config: StoreConfig,
}

impl Database {
    pub fn open(path: &Path, config: StoreConfig) -> Fallible<Self> {
        log::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        Self::setup(conn, config)
    }

    pub fn open_in_memory(config: StoreConfig) -> Fallible<Self> {
        let conn = Connection::open_in_memory()?;
        Self::setup(conn, config)
    }

    fn setup(conn: Connection, config: StoreConfig) -> Fallible<Self> {
        if config.enforce_references {
            conn.execute_batch("pragma foreign_keys = on;")?;
        } else {
            conn.execute_batch("pragma foreign_keys = off;")?;
        }
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, config })
    }

    // Catalog

    /// Drops every table, recreates them, and loads `words`. All session
    /// and score history is lost. Nothing is committed if any insert fails.
    pub fn replace_words(&mut self, words: &[Word]) -> Fallible<usize> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(DROP_TABLES)?;
        tx.execute_batch(SCHEMA)?;
        {
            let mut insert =
                tx.prepare("insert into words (id, level, text) values (?1, ?2, ?3)")?;
            for word in words {
                insert.execute(params![word.id, word.level, word.text])?;
            }
        }
        tx.commit()?;
        log::info!("Replaced the catalog with {} words", words.len());
        Ok(words.len())
    }

    /// Reconciles the catalog with `words` without touching sessions or
    /// scores. New ids are inserted; for known ids only the text is updated,
    /// and only when it differs.
    pub fn sync_words(&mut self, words: &[Word]) -> Fallible<SyncReport> {
        let mut report = SyncReport::default();
        let tx = self.conn.transaction()?;
        {
            let mut find = tx.prepare("select text from words where id = ?1")?;
            let mut update = tx.prepare("update words set text = ?2 where id = ?1")?;
            let mut insert =
                tx.prepare("insert into words (id, level, text) values (?1, ?2, ?3)")?;
            for word in words {
                report.checked += 1;
                let stored: Option<String> = find
                    .query_row(params![word.id], |row| row.get(0))
                    .optional()?;
                match stored {
                    Some(text) if text == word.text => {
                        log::debug!("Word {} is unchanged", word.id);
                    }
                    Some(text) => {
                        log::debug!("Word {} changed from '{}' to '{}'", word.id, text, word.text);
                        update.execute(params![word.id, word.text])?;
                        report.updated += 1;
                    }
                    None => {
                        log::debug!("Word {} ('{}') is new", word.id, word.text);
                        insert.execute(params![word.id, word.level, word.text])?;
                        report.added += 1;
                    }
                }
            }
        }
        tx.commit()?;
        log::info!("{report}");
        Ok(report)
    }

    /// All words, ordered by id.
    pub fn words(&self) -> Fallible<Vec<Word>> {
        let mut stmt = self
            .conn
            .prepare("select id, level, text from words order by id")?;
        let words = stmt
            .query_map([], |row| {
                Ok(Word {
                    id: row.get(0)?,
                    level: row.get(1)?,
                    text: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words)
    }

    pub fn get_word(&self, id: WordId) -> Fallible<Option<Word>> {
        let word = self
            .conn
            .query_row(
                "select id, level, text from words where id = ?1",
                params![id],
                |row| {
                    Ok(Word {
                        id: row.get(0)?,
                        level: row.get(1)?,
                        text: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(word)
    }

    pub fn word_count(&self) -> Fallible<u64> {
        let count: i64 = self
            .conn
            .query_row("select count(*) from words", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Picks one word with equal probability across the whole catalog.
    pub fn get_random_word(&self, rng: &mut TinyRng) -> Fallible<(WordId, String)> {
        let count = self.word_count()?;
        let offset = rng.below(count).ok_or(DrillError::EmptyCatalog)?;
        let word = self.conn.query_row(
            "select id, text from words order by id limit 1 offset ?1",
            params![offset as i64],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(word)
    }

    // Sessions

    /// Starts a session stamped with the current time and returns the id
    /// assigned by the insert.
    pub fn new_session(&self) -> Fallible<SessionId> {
        self.new_session_at(Timestamp::now())
    }

    pub fn new_session_at(&self, created_at: Timestamp) -> Fallible<SessionId> {
        self.conn.execute(
            "insert into sessions (created_at) values (?1)",
            params![created_at],
        )?;
        let id = self.conn.last_insert_rowid();
        log::debug!("Started session {id}");
        Ok(id)
    }

    pub fn session(&self, id: SessionId) -> Fallible<Option<Session>> {
        let session = self
            .conn
            .query_row(
                "select id, created_at from sessions where id = ?1",
                params![id],
                |row| {
                    Ok(Session {
                        id: row.get(0)?,
                        created_at: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    /// All sessions, oldest first.
    pub fn sessions(&self) -> Fallible<Vec<Session>> {
        let mut stmt = self
            .conn
            .prepare("select id, created_at from sessions order by id")?;
        let sessions = stmt
            .query_map([], |row| {
                Ok(Session {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    pub fn latest_session(&self) -> Fallible<Option<Session>> {
        let session = self
            .conn
            .query_row(
                "select id, created_at from sessions order by id desc limit 1",
                [],
                |row| {
                    Ok(Session {
                        id: row.get(0)?,
                        created_at: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    // Scores

    /// Records one attempt at `word_id` in `session_id`.
    pub fn score_word(&self, session_id: SessionId, word_id: WordId, success: bool) -> Fallible<()> {
        if self.config.enforce_references {
            if self.session(session_id)?.is_none() {
                return Err(DrillError::UnknownSession { session_id }.into());
            }
            if self.get_word(word_id)?.is_none() {
                return Err(DrillError::UnknownWord { word_id }.into());
            }
        }
        self.conn.execute(
            "insert into scores (session_id, word_id, correct) values (?1, ?2, ?3)",
            params![session_id, word_id, success as i64],
        )?;
        Ok(())
    }

    pub fn session_tally(&self, session_id: SessionId) -> Fallible<Tally> {
        let (correct, total): (i64, i64) = self.conn.query_row(
            "select coalesce(sum(correct), 0), count(*) from scores where session_id = ?1",
            params![session_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(Tally {
            correct: correct as u64,
            total: total as u64,
        })
    }

    /// The fraction of the session's attempts that were correct. A session
    /// with no attempts has no score.
    pub fn get_session_score(&self, session_id: SessionId) -> Fallible<f64> {
        let tally = self.session_tally(session_id)?;
        let score = tally
            .accuracy()
            .ok_or(DrillError::NoAttempts { session_id })?;
        Ok(score)
    }

    /// Words answered incorrectly in the session, one entry per incorrect
    /// attempt, in the order the attempts were made.
    pub fn get_incorrect_words(&self, session_id: SessionId) -> Fallible<Vec<MissedWord>> {
        let mut stmt = self.conn.prepare(
            "select s.word_id, w.text
             from scores s
             join words w on w.id = s.word_id
             where s.session_id = ?1 and s.correct = 0
             order by s.rowid",
        )?;
        let missed = stmt
            .query_map(params![session_id], |row| {
                Ok(MissedWord {
                    word_id: row.get(0)?,
                    text: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(missed)
    }

    pub fn session_report(&self, session_id: SessionId) -> Fallible<SessionReport> {
        let session = self
            .session(session_id)?
            .ok_or(DrillError::UnknownSession { session_id })?;
        let tally = self.session_tally(session_id)?;
        let missed = self.get_incorrect_words(session_id)?;
        Ok(SessionReport::new(session, tally, missed))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use tempfile::tempdir;

    use super::*;
    use crate::helper::sample_db;
    use crate::helper::sample_words;

    fn count(db: &Database, table: &str) -> Fallible<i64> {
        let n = db
            .conn
            .query_row(&format!("select count(*) from {table}"), [], |row| {
                row.get(0)
            })?;
        Ok(n)
    }

    #[test]
    fn test_replace_loads_words_verbatim() -> Fallible<()> {
        let db = sample_db()?;
        assert_eq!(db.words()?, sample_words());
        assert_eq!(db.word_count()?, 5);
        Ok(())
    }

    #[test]
    fn test_replace_erases_history() -> Fallible<()> {
        let mut db = sample_db()?;
        let session = db.new_session()?;
        db.score_word(session, 1, true)?;
        db.score_word(session, 2, false)?;

        db.replace_words(&sample_words())?;
        assert_eq!(count(&db, "sessions")?, 0);
        assert_eq!(count(&db, "scores")?, 0);
        assert!(db.sessions()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_replace_with_duplicate_ids_keeps_old_catalog() -> Fallible<()> {
        let mut db = sample_db()?;
        let session = db.new_session()?;
        let result = db.replace_words(&[Word::new(1, 1, "A"), Word::new(1, 1, "B")]);
        assert!(result.is_err());
        assert_eq!(db.words()?, sample_words());
        assert!(db.session(session)?.is_some());
        Ok(())
    }

    #[test]
    fn test_sync_is_idempotent() -> Fallible<()> {
        let mut db = Database::open_in_memory(StoreConfig::default())?;
        let first = db.sync_words(&sample_words())?;
        assert_eq!(
            first,
            SyncReport {
                checked: 5,
                updated: 0,
                added: 5
            }
        );
        let before = db.words()?;
        let second = db.sync_words(&sample_words())?;
        assert_eq!(
            second,
            SyncReport {
                checked: 5,
                updated: 0,
                added: 0
            }
        );
        assert_eq!(db.words()?, before);
        Ok(())
    }

    #[test]
    fn test_sync_updates_text_only() -> Fallible<()> {
        let mut db = sample_db()?;
        let report = db.sync_words(&[Word::new(7, 9, "NEW")])?;
        assert_eq!(
            report,
            SyncReport {
                checked: 1,
                updated: 1,
                added: 0
            }
        );
        assert_eq!(db.get_word(7)?, Some(Word::new(7, 3, "NEW")));
        Ok(())
    }

    #[test]
    fn test_sync_keeps_history() -> Fallible<()> {
        let mut db = sample_db()?;
        let session = db.new_session()?;
        db.score_word(session, 3, false)?;
        db.sync_words(&[Word::new(3, 2, "MOM"), Word::new(10, 1, "SISTER")])?;
        assert_eq!(db.session_tally(session)?.total, 1);
        assert_eq!(
            db.get_incorrect_words(session)?,
            vec![MissedWord {
                word_id: 3,
                text: "MOM".to_string()
            }]
        );
        assert_eq!(db.word_count()?, 6);
        Ok(())
    }

    #[test]
    fn test_random_word_on_empty_catalog() -> Fallible<()> {
        let db = Database::open_in_memory(StoreConfig::default())?;
        let mut rng = TinyRng::from_seed(0);
        let err = db.get_random_word(&mut rng).unwrap_err();
        assert_eq!(err.kind(), Some(&DrillError::EmptyCatalog));
        Ok(())
    }

    #[test]
    fn test_random_word_comes_from_catalog() -> Fallible<()> {
        let db = sample_db()?;
        let catalog: HashSet<(WordId, String)> = sample_words()
            .into_iter()
            .map(|w| (w.id, w.text))
            .collect();
        let mut rng = TinyRng::from_seed(1234);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let word = db.get_random_word(&mut rng)?;
            assert!(catalog.contains(&word));
            seen.insert(word);
        }
        assert_eq!(seen, catalog);
        Ok(())
    }

    #[test]
    fn test_random_word_does_not_write() -> Fallible<()> {
        let db = sample_db()?;
        let mut rng = TinyRng::from_seed(5);
        db.get_random_word(&mut rng)?;
        assert_eq!(db.words()?, sample_words());
        assert_eq!(count(&db, "sessions")?, 0);
        Ok(())
    }

    #[test]
    fn test_session_ids_increase() -> Fallible<()> {
        let db = sample_db()?;
        let ts = Timestamp::now();
        // Same timestamp twice: the ids must still differ.
        let a = db.new_session_at(ts)?;
        let b = db.new_session_at(ts)?;
        assert!(b > a);
        assert_eq!(db.session(a)?.map(|s| s.created_at), Some(ts));
        assert_eq!(db.latest_session()?.map(|s| s.id), Some(b));
        assert_eq!(
            db.sessions()?.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![a, b]
        );
        Ok(())
    }

    #[test]
    fn test_no_latest_session_on_fresh_store() -> Fallible<()> {
        let db = sample_db()?;
        assert_eq!(db.latest_session()?, None);
        Ok(())
    }

    #[test]
    fn test_session_score_ratio() -> Fallible<()> {
        let db = sample_db()?;
        let session = db.new_session()?;
        for (word_id, success) in [(1, true), (2, false), (3, true), (4, false), (7, true)] {
            db.score_word(session, word_id, success)?;
        }
        assert_eq!(db.get_session_score(session)?, 0.6);
        assert_eq!(
            db.session_tally(session)?,
            Tally {
                correct: 3,
                total: 5
            }
        );
        Ok(())
    }

    #[test]
    fn test_session_score_without_attempts() -> Fallible<()> {
        let db = sample_db()?;
        let session = db.new_session()?;
        let err = db.get_session_score(session).unwrap_err();
        assert_eq!(err.kind(), Some(&DrillError::NoAttempts { session_id: session }));
        Ok(())
    }

    #[test]
    fn test_scores_are_per_session() -> Fallible<()> {
        let db = sample_db()?;
        let a = db.new_session()?;
        let b = db.new_session()?;
        db.score_word(a, 1, false)?;
        db.score_word(b, 1, true)?;
        db.score_word(b, 2, true)?;
        assert_eq!(db.get_session_score(a)?, 0.0);
        assert_eq!(db.get_session_score(b)?, 1.0);
        assert!(db.get_incorrect_words(b)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_incorrect_words_keep_every_miss() -> Fallible<()> {
        let db = sample_db()?;
        let session = db.new_session()?;
        db.score_word(session, 3, false)?;
        db.score_word(session, 1, true)?;
        db.score_word(session, 2, false)?;
        db.score_word(session, 3, true)?;
        db.score_word(session, 3, false)?;
        db.score_word(session, 1, true)?;
        let missed = db.get_incorrect_words(session)?;
        let ids: Vec<WordId> = missed.iter().map(|m| m.word_id).collect();
        assert_eq!(ids, vec![3, 2, 3]);
        assert_eq!(missed[1].text, "THANK YOU");
        Ok(())
    }

    #[test]
    fn test_score_rejects_unknown_references() -> Fallible<()> {
        let db = sample_db()?;
        let session = db.new_session()?;
        let err = db.score_word(session + 1, 1, true).unwrap_err();
        assert_eq!(
            err.kind(),
            Some(&DrillError::UnknownSession {
                session_id: session + 1
            })
        );
        let err = db.score_word(session, 99, true).unwrap_err();
        assert_eq!(err.kind(), Some(&DrillError::UnknownWord { word_id: 99 }));
        assert_eq!(count(&db, "scores")?, 0);
        Ok(())
    }

    #[test]
    fn test_permissive_store_keeps_orphans() -> Fallible<()> {
        let config = StoreConfig {
            enforce_references: false,
        };
        let mut db = Database::open_in_memory(config)?;
        db.replace_words(&sample_words())?;
        db.score_word(42, 99, false)?;
        assert_eq!(db.get_session_score(42)?, 0.0);
        // The missing word has no text to join against.
        assert!(db.get_incorrect_words(42)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_session_report() -> Fallible<()> {
        let db = sample_db()?;
        let session = db.new_session()?;
        db.score_word(session, 4, false)?;
        db.score_word(session, 1, true)?;
        let report = db.session_report(session)?;
        assert_eq!(report.session.id, session);
        assert_eq!(report.accuracy, Some(0.5));
        assert_eq!(report.missed.len(), 1);
        assert_eq!(report.missed[0].text, "FATHER");

        let err = db.session_report(session + 1).unwrap_err();
        assert!(matches!(err.kind(), Some(DrillError::UnknownSession { .. })));
        Ok(())
    }

    #[test]
    fn test_data_survives_reopen() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("flash_cards.db");
        let session = {
            let mut db = Database::open(&path, StoreConfig::default())?;
            db.replace_words(&sample_words())?;
            let session = db.new_session()?;
            db.score_word(session, 2, true)?;
            session
        };
        let db = Database::open(&path, StoreConfig::default())?;
        assert_eq!(db.words()?, sample_words());
        assert_eq!(db.get_session_score(session)?, 1.0);
        Ok(())
    }
}
