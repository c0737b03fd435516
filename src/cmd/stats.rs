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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::records::RecordStore;
use crate::store::ReviewStateStore;
use crate::types::timestamp::Timestamp;

pub fn print_stats(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let stats = get_stats(&coll, Timestamp::now())?;
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{stats_json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    saved_count: usize,
    record_count: usize,
    due_count: usize,
    review_count: usize,
}

fn get_stats(coll: &Collection, now: Timestamp) -> Fallible<Stats> {
    let cards = coll.catalog.cards();
    let record_count = coll.db.record_count()?;
    let store = ReviewStateStore::from_records(coll.db.load_records(1, record_count.max(1))?);
    Ok(Stats {
        card_count: cards.len(),
        saved_count: cards.iter().filter(|card| card.is_saved()).count(),
        record_count,
        due_count: cards
            .iter()
            .filter(|card| store.is_due(card.id(), now))
            .count(),
        review_count: coll.db.review_log()?.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_collection;
    use crate::srs::apply_rating;
    use crate::types::card_id::CardId;
    use crate::types::rating::Rating;

    #[test]
    fn test_stats() -> Fallible<()> {
        let directory = create_tmp_collection(&[("a", "1"), ("b", "2"), ("c", "3")])?;
        let coll = Collection::new(Some(directory.display().to_string()))?;
        let now = Timestamp::from_millis(1000);
        let id = CardId::new("a");
        let state = apply_rating(None, Rating::Pass, now);
        coll.db.save_record(&id, &state)?;
        coll.db.save_record(&id, &apply_rating(Some(&state), Rating::Pass, now))?;
        let stats = get_stats(&coll, now)?;
        assert_eq!(stats.card_count, 3);
        assert_eq!(stats.saved_count, 0);
        assert_eq!(stats.record_count, 1);
        assert_eq!(stats.due_count, 2);
        assert_eq!(stats.review_count, 2);
        Ok(())
    }
}
