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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::store::ReviewStateStore;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// The maximum number of cards in a freshly built session.
pub const SESSION_SIZE: usize = 20;

/// Builds the queue for a session, in presentation order.
///
/// Normally this is the due cards, most overdue first, with never-rated cards
/// (due since the epoch) ahead of everything else. With `force_random`, due
/// dates are ignored and the queue is a random sample of the catalog, so the
/// user can keep practicing after clearing every due card.
pub fn select_queue<R: Rng + ?Sized>(
    catalog: &[Card],
    store: &ReviewStateStore,
    now: Timestamp,
    force_random: bool,
    rng: &mut R,
) -> Vec<Card> {
    if force_random {
        let mut cards: Vec<Card> = catalog.to_vec();
        cards.shuffle(rng);
        cards.truncate(SESSION_SIZE);
        return cards;
    }
    let mut due: Vec<(Timestamp, &Card)> = catalog
        .iter()
        .filter(|card| store.is_due(card.id(), now))
        .map(|card| (store.due_time(card.id()), card))
        .collect();
    // Stable, so ties keep catalog order.
    due.sort_by_key(|(due_time, _)| *due_time);
    due.into_iter()
        .take(SESSION_SIZE)
        .map(|(_, card)| card.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::card_id::CardId;
    use crate::types::srs_state::SrsRecord;
    use crate::types::srs_state::SrsState;

    fn card(text: &str) -> Card {
        Card::new("test", text, "meaning")
    }

    fn record(text: &str, due: i64) -> SrsRecord {
        SrsRecord {
            id: CardId::new(text),
            state: SrsState {
                interval: 1,
                repetition: 1,
                ease_factor: 2.5,
                next_review_due: Timestamp::from_millis(due),
            },
        }
    }

    fn texts(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|card| card.text()).collect()
    }

    #[test]
    fn test_two_of_three_due() {
        let catalog = vec![card("a"), card("b"), card("c")];
        let store = ReviewStateStore::from_records(vec![
            record("a", 900),
            record("b", 5000),
            record("c", 100),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        let queue = select_queue(&catalog, &store, Timestamp::from_millis(1000), false, &mut rng);
        assert_eq!(texts(&queue), vec!["c", "a"]);
    }

    #[test]
    fn test_unrated_cards_come_first() {
        let catalog = vec![card("seen"), card("new")];
        let store = ReviewStateStore::from_records(vec![record("seen", 10)]);
        let mut rng = StdRng::seed_from_u64(0);
        let queue = select_queue(&catalog, &store, Timestamp::from_millis(1000), false, &mut rng);
        assert_eq!(texts(&queue), vec!["new", "seen"]);
    }

    #[test]
    fn test_due_exactly_now_is_due() {
        let catalog = vec![card("a")];
        let store = ReviewStateStore::from_records(vec![record("a", 1000)]);
        let mut rng = StdRng::seed_from_u64(0);
        let queue = select_queue(&catalog, &store, Timestamp::from_millis(1000), false, &mut rng);
        assert_eq!(queue.len(), 1);
        let queue = select_queue(&catalog, &store, Timestamp::from_millis(999), false, &mut rng);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let store = ReviewStateStore::new();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select_queue(&[], &store, Timestamp::now(), false, &mut rng).is_empty());
        assert!(select_queue(&[], &store, Timestamp::now(), true, &mut rng).is_empty());
    }

    #[test]
    fn test_queue_is_capped() {
        let catalog: Vec<Card> = (0..50).map(|i| card(&format!("word{i}"))).collect();
        let store = ReviewStateStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let queue = select_queue(&catalog, &store, Timestamp::now(), false, &mut rng);
        assert_eq!(queue.len(), SESSION_SIZE);
        // Ties keep catalog order.
        assert_eq!(queue[0].text(), "word0");
        assert_eq!(queue[19].text(), "word19");
        let queue = select_queue(&catalog, &store, Timestamp::now(), true, &mut rng);
        assert_eq!(queue.len(), SESSION_SIZE);
    }

    #[test]
    fn test_every_selected_card_is_due() {
        let catalog: Vec<Card> = (0..40).map(|i| card(&format!("w{i}"))).collect();
        let records = (0..30).map(|i| record(&format!("w{i}"), i * 100)).collect();
        let store = ReviewStateStore::from_records(records);
        let now = Timestamp::from_millis(1500);
        let mut rng = StdRng::seed_from_u64(2);
        let queue = select_queue(&catalog, &store, now, false, &mut rng);
        assert!(queue.len() <= SESSION_SIZE);
        for card in &queue {
            assert!(store.is_due(card.id(), now));
        }
        let due_times: Vec<Timestamp> = queue.iter().map(|c| store.due_time(c.id())).collect();
        assert!(due_times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_force_random_ignores_due_dates() {
        let catalog = vec![card("a"), card("b"), card("c")];
        let store = ReviewStateStore::from_records(vec![
            record("a", i64::MAX),
            record("b", i64::MAX),
            record("c", i64::MAX),
        ]);
        let mut rng = StdRng::seed_from_u64(42);
        let now = Timestamp::from_millis(0);
        assert!(select_queue(&catalog, &store, now, false, &mut rng).is_empty());
        let queue = select_queue(&catalog, &store, now, true, &mut rng);
        assert_eq!(queue.len(), 3);
        let selected: HashSet<&str> = queue.iter().map(|c| c.text()).collect();
        assert_eq!(selected, HashSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_force_random_is_a_sample_without_repeats() {
        let catalog: Vec<Card> = (0..25).map(|i| card(&format!("w{i}"))).collect();
        let store = ReviewStateStore::new();
        let mut rng = StdRng::seed_from_u64(9);
        let queue = select_queue(&catalog, &store, Timestamp::now(), true, &mut rng);
        let ids: HashSet<&CardId> = queue.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), queue.len());
        assert_eq!(queue.len(), SESSION_SIZE);
    }
}
