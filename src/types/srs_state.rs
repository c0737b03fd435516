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

use serde::Serialize;

use crate::srs::INITIAL_EASE;
use crate::types::card_id::CardId;
use crate::types::timestamp::Timestamp;

/// The scheduling state of a card the user has rated at least once.
#[derive(Clone, Copy, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsState {
    /// The current spacing, in whole days.
    pub interval: u32,
    /// Consecutive successful reviews since the last failure.
    pub repetition: u32,
    /// Multiplier controlling how fast the interval grows. Never below 1.3.
    pub ease_factor: f64,
    /// When the card is next due.
    pub next_review_due: Timestamp,
}

impl SrsState {
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_due <= now
    }
}

/// The state of a card that has never been rated.
impl Default for SrsState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetition: 0,
            ease_factor: INITIAL_EASE,
            next_review_due: Timestamp::EPOCH,
        }
    }
}

/// A persisted review state, as exchanged with the record store.
#[derive(Clone, PartialEq, Debug)]
pub struct SrsRecord {
    pub id: CardId,
    pub state: SrsState,
}
