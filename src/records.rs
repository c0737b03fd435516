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

use crate::error::Fallible;
use crate::types::card_id::CardId;
use crate::types::srs_state::SrsRecord;
use crate::types::srs_state::SrsState;

/// Persistent storage for the user's review states.
pub trait RecordStore: Send + Sync {
    /// Fetches one page of records. Pages are numbered from 1.
    fn load_records(&self, page: usize, limit: usize) -> Fallible<Vec<SrsRecord>>;

    /// Saves a card's review state, replacing any previous one.
    fn save_record(&self, id: &CardId, state: &SrsState) -> Fallible<()>;
}
