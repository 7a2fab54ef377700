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

use std::io::stdin;
use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use signdrill_core::Fallible;
use signdrill_core::SessionId;

use crate::cmd::catalog::import_words;
use crate::cmd::catalog::sync_words;
use crate::cmd::drill::DrillConfig;
use crate::cmd::drill::run_drill;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::list_sessions;
use crate::cmd::stats::print_stats;
use crate::db::Database;
use crate::db::StoreConfig;
use crate::sampler::SamplingMode;

const DEFAULT_SOURCE: &str = "asl_data.csv";

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the database file.
    #[arg(long, global = true, default_value = "flash_cards.db")]
    db: PathBuf,
    /// Store scores even when their session or word does not exist.
    #[arg(long, global = true)]
    allow_orphan_scores: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Erase the database and load the word list from scratch. All sessions and scores are lost.
    Import {
        /// Path to the CSV word list. Default is asl_data.csv.
        source: Option<PathBuf>,
    },
    /// Add new words and update changed ones from the word list, keeping all sessions.
    Sync {
        /// Path to the CSV word list. Default is asl_data.csv.
        source: Option<PathBuf>,
    },
    /// Drill randomly chosen words on the console.
    Drill {
        /// Number of words to ask. Default is 5.
        #[arg(long, default_value_t = 5)]
        questions: usize,
        /// Whether a word can come up more than once in a drill.
        #[arg(long, default_value_t = SamplingMode::WithReplacement)]
        sampling: SamplingMode,
        /// Seed for picking words. By default, the current time is used.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the score and missed words of a session.
    Stats {
        /// The session to report on. By default, the most recent session is used.
        session: Option<SessionId>,
        /// Which output format to use.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// List all sessions.
    Sessions,
}

pub fn entrypoint() -> Fallible<()> {
    let cli = Cli::parse();
    let config = StoreConfig {
        enforce_references: !cli.allow_orphan_scores,
    };
    let mut db = Database::open(&cli.db, config)?;
    let mut out = stdout().lock();
    match cli.command {
        Command::Import { source } => {
            let source = source.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));
            import_words(&mut db, &source, &mut out)
        }
        Command::Sync { source } => {
            let source = source.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));
            sync_words(&mut db, &source, &mut out)
        }
        Command::Drill {
            questions,
            sampling,
            seed,
        } => {
            let config = DrillConfig {
                questions,
                sampling,
                seed,
            };
            run_drill(&db, &config, &mut stdin().lock(), &mut out).map(|_| ())
        }
        Command::Stats { session, format } => print_stats(&db, session, format, &mut out),
        Command::Sessions => list_sessions(&db, &mut out),
    }
}
