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

use crate::types::card_id::CardId;

/// A vocabulary item that can be drilled.
#[derive(Clone, Debug)]
pub struct Card {
    /// The card's identity, derived from its text.
    id: CardId,
    /// The name of the deck (vocabulary file) this card belongs to.
    deck_name: String,
    /// The word or phrase being learned.
    text: String,
    /// An optional pronunciation guide.
    reading: Option<String>,
    /// The meaning, in Markdown.
    meaning: String,
    /// An optional usage example, in Markdown.
    example: Option<String>,
    /// Whether the user has saved this card.
    saved: bool,
}

impl Card {
    pub fn new(deck_name: impl Into<String>, text: &str, meaning: &str) -> Self {
        Self {
            id: CardId::new(text),
            deck_name: deck_name.into(),
            text: text.trim().to_string(),
            reading: None,
            meaning: meaning.trim().to_string(),
            example: None,
            saved: false,
        }
    }

    pub fn with_reading(mut self, reading: Option<String>) -> Self {
        self.reading = reading.map(|r| r.trim().to_string());
        self
    }

    pub fn with_example(mut self, example: Option<String>) -> Self {
        self.example = example.map(|e| e.trim().to_string());
        self
    }

    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = saved;
        self
    }

    pub fn id(&self) -> &CardId {
        &self.id
    }

    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reading(&self) -> Option<&str> {
        self.reading.as_deref()
    }

    pub fn meaning(&self) -> &str {
        &self.meaning
    }

    pub fn example(&self) -> Option<&str> {
        self.example.as_deref()
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }
}
