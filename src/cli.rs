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

use clap::Parser;

use crate::catalog::Scope;
use crate::cmd::check::check_collection;
use crate::cmd::drill::server::DrillOptions;
use crate::cmd::drill::server::start_server;
use crate::cmd::export::export_collection;
use crate::cmd::stats::print_stats;
use crate::error::Fallible;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill the vocabulary that is due, in the browser.
    Drill {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
        /// Only drill saved words.
        #[arg(long)]
        saved: bool,
        /// Drill without loading or saving review history.
        #[arg(long)]
        guest: bool,
        /// The port to use for the web server. Overrides the configuration file.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser automatically.
        #[arg(long)]
        no_open: bool,
    },
    /// Check the integrity of a collection.
    Check {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Print collection statistics as JSON.
    Stats {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
    /// Export the collection and its review history as JSON.
    Export {
        /// Path to the collection directory. By default, the current working directory is used.
        directory: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            directory,
            saved,
            guest,
            port,
            no_open,
        } => {
            let options = DrillOptions {
                scope: if saved { Scope::Saved } else { Scope::All },
                guest,
                port,
                open_browser: !no_open,
            };
            start_server(directory, options).await
        }
        Command::Check { directory } => check_collection(directory),
        Command::Stats { directory } => print_stats(directory),
        Command::Export { directory } => export_collection(directory),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Command::command().debug_assert();
    }

    #[test]
    fn test_parse_drill() {
        let cli = Command::try_parse_from([
            "wordcards",
            "drill",
            "vocab",
            "--saved",
            "--port",
            "9000",
        ]);
        match cli {
            Ok(Command::Drill {
                directory,
                saved,
                guest,
                port,
                no_open,
            }) => {
                assert_eq!(directory.as_deref(), Some("vocab"));
                assert!(saved);
                assert!(!guest);
                assert_eq!(port, Some(9000));
                assert!(!no_open);
            }
            _ => panic!("expected a drill command"),
        }
    }
}
