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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::CONFIG_FILE_NAME;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::card_id::CardId;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VocabularyFile {
    #[serde(default)]
    word: Vec<WordEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WordEntry {
    text: String,
    meaning: String,
    reading: Option<String>,
    example: Option<String>,
    #[serde(default)]
    saved: bool,
}

/// Parses the contents of a single vocabulary file.
pub fn parse_vocabulary(deck_name: &str, contents: &str) -> Fallible<Vec<Card>> {
    let file: VocabularyFile = toml::from_str(contents)?;
    let mut cards = Vec::new();
    for entry in file.word {
        if entry.text.trim().is_empty() {
            return fail(format!("empty word in deck '{deck_name}'."));
        }
        if entry.meaning.trim().is_empty() {
            return fail(format!(
                "word '{}' in deck '{deck_name}' has no meaning.",
                entry.text.trim()
            ));
        }
        let card = Card::new(deck_name, &entry.text, &entry.meaning)
            .with_reading(entry.reading)
            .with_example(entry.example)
            .with_saved(entry.saved);
        cards.push(card);
    }
    Ok(cards)
}

/// Parses every vocabulary file under the given directory. Each `.toml` file
/// is a deck named after its file stem. Words must be unique across the
/// whole collection.
pub fn parse_collection(directory: &Path) -> Fallible<Vec<Card>> {
    let mut all_cards = Vec::new();
    let mut seen: HashSet<CardId> = HashSet::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "toml") {
            continue;
        }
        if path.file_name().is_some_and(|name| name == CONFIG_FILE_NAME) {
            continue;
        }
        let deck_name: &str = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem,
            None => return fail(format!("invalid file name: {}", path.display())),
        };
        let contents = read_to_string(path)?;
        let cards = parse_vocabulary(deck_name, &contents)?;
        log::debug!("Parsed {} words from {}.", cards.len(), path.display());
        for card in cards {
            if !seen.insert(card.id().clone()) {
                return fail(format!("duplicate word: '{}'.", card.id()));
            }
            all_cards.push(card);
        }
    }
    Ok(all_cards)
}
