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

use std::collections::HashMap;

use crate::types::card_id::CardId;
use crate::types::srs_state::SrsRecord;
use crate::types::srs_state::SrsState;
use crate::types::timestamp::Timestamp;

/// The review state of every card the user has rated, held in memory for the
/// duration of a session. Updated locally on every rating; persistence
/// happens separately.
pub struct ReviewStateStore {
    /// A map of card IDs to their review state.
    states: HashMap<CardId, SrsState>,
}

impl ReviewStateStore {
    /// Creates a new, empty store. Every card is due.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// Creates a store from records fetched from the record store. Later
    /// records for the same card replace earlier ones.
    pub fn from_records(records: Vec<SrsRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record.id, record.state);
        }
        store
    }

    /// Retrieves a card's review state. Returns `None` if the card has never
    /// been rated.
    pub fn get(&self, id: &CardId) -> Option<&SrsState> {
        self.states.get(id)
    }

    /// Inserts or replaces a card's review state.
    pub fn insert(&mut self, id: CardId, state: SrsState) {
        self.states.insert(id, state);
    }

    /// When the card is due. Cards without state are due since the epoch.
    pub fn due_time(&self, id: &CardId) -> Timestamp {
        self.get(id)
            .map(|state| state.next_review_due)
            .unwrap_or(Timestamp::EPOCH)
    }

    pub fn is_due(&self, id: &CardId, now: Timestamp) -> bool {
        match self.get(id) {
            None => true,
            Some(state) => state.is_due(now),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.states.len()
    }
}
