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

//! A review session: the due queue, the user's ratings, and the bookkeeping
//! around them.

mod queue;
pub mod sync;

use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::catalog::Scope;
use crate::catalog::load_catalog;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::records::RecordStore;
use crate::select::select_queue;
use crate::session::queue::SessionQueue;
use crate::session::sync::Syncer;
use crate::srs::Preview;
use crate::srs::apply_rating;
use crate::srs::preview_interval;
use crate::store::ReviewStateStore;
use crate::types::card::Card;
use crate::types::card_id::CardId;
use crate::types::rating::Rating;
use crate::types::srs_state::SrsState;
use crate::types::timestamp::Timestamp;

pub struct Session {
    /// Every card in scope for this session.
    catalog: Vec<Card>,
    store: ReviewStateStore,
    queue: SessionQueue,
    /// Absent for guests, whose ratings are not persisted.
    syncer: Option<Syncer>,
}

/// The outcome of rating a card.
pub struct RatedCard {
    pub card: Card,
    pub state: SrsState,
}

impl Session {
    /// Creates a session that has not selected its queue yet.
    pub fn new(catalog: Vec<Card>, store: ReviewStateStore, syncer: Option<Syncer>) -> Self {
        Self {
            catalog,
            store,
            queue: SessionQueue::new(),
            syncer,
        }
    }

    /// Loads the catalog and, if there is a record store, the user's review
    /// states. A catalog failure is returned to the caller. A record store
    /// failure is logged, and the session starts as if nothing had ever been
    /// reviewed.
    pub fn open(
        catalog: &dyn Catalog,
        scope: Scope,
        records: Option<Arc<dyn RecordStore>>,
        config: &Config,
    ) -> Fallible<Self> {
        let cards = load_catalog(catalog, scope, config.page_size)?;
        let store = match &records {
            Some(records) => match records.load_records(1, config.records_limit) {
                Ok(records) => {
                    log::debug!("Loaded {} review records.", records.len());
                    ReviewStateStore::from_records(records)
                }
                Err(e) => {
                    log::error!("Failed to load review records: {e}");
                    ReviewStateStore::new()
                }
            },
            None => {
                log::debug!("Guest session, review records are not loaded.");
                ReviewStateStore::new()
            }
        };
        let syncer = records.map(Syncer::new);
        Ok(Self::new(cards, store, syncer))
    }

    /// Builds the queue of due cards.
    pub fn start<R: Rng + ?Sized>(&mut self, now: Timestamp, rng: &mut R) {
        let cards = select_queue(&self.catalog, &self.store, now, false, rng);
        log::debug!(
            "{} of {} cards selected for review.",
            cards.len(),
            self.catalog.len()
        );
        self.queue.fill(cards);
    }

    /// Once the session is empty, starts another round with a random sample
    /// of the catalog, regardless of due dates.
    pub fn review_more<R: Rng + ?Sized>(&mut self, now: Timestamp, rng: &mut R) -> Fallible<()> {
        if !self.queue.is_empty() {
            return fail("there are still cards to review.");
        }
        let cards = select_queue(&self.catalog, &self.store, now, true, rng);
        log::debug!("{} cards selected for extra practice.", cards.len());
        self.queue.fill(cards);
        Ok(())
    }

    /// Rates the current card. The new state is stored locally before the
    /// save is dispatched, and the queue moves on without waiting for it.
    pub fn rate(&mut self, rating: Rating, now: Timestamp) -> Fallible<RatedCard> {
        let id: CardId = match self.queue.current_card() {
            Some(card) => card.id().clone(),
            None => return fail("there is no card to rate."),
        };
        let state = apply_rating(self.store.get(&id), rating, now);
        log::debug!(
            "{id} {rating} I={}d R={} EF={:.2} due={}",
            state.interval,
            state.repetition,
            state.ease_factor,
            state.next_review_due
        );
        self.store.insert(id.clone(), state);
        if let Some(syncer) = &self.syncer {
            let _ = syncer.dispatch(id, state);
        }
        let card = self.queue.advance(rating)?;
        Ok(RatedCard { card, state })
    }

    /// What each rating would schedule for the current card.
    pub fn preview(&self, rating: Rating) -> Option<Preview> {
        self.queue
            .current_card()
            .map(|card| preview_interval(self.store.get(card.id()), rating))
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.queue.current_card()
    }

    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    pub fn is_loading(&self) -> bool {
        self.queue.is_loading()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Detaches the syncer so the host can wait for pending saves. Ratings
    /// made afterwards are no longer persisted.
    pub fn take_syncer(&mut self) -> Option<Syncer> {
        self.syncer.take()
    }

    /// The size of the catalog. Zero means there is no vocabulary at all,
    /// as opposed to nothing being due.
    pub fn total_available_cards(&self) -> usize {
        self.catalog.len()
    }

    #[cfg(test)]
    pub fn state_of(&self, id: &CardId) -> Option<&SrsState> {
        self.store.get(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog::DeckCatalog;
    use crate::error::ErrorReport;
    use crate::types::srs_state::SrsRecord;
    use crate::types::timestamp::MILLIS_PER_DAY;

    /// A record store that keeps everything in memory.
    struct MemoryStore {
        records: Mutex<Vec<SrsRecord>>,
    }

    impl MemoryStore {
        fn new(records: Vec<SrsRecord>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
            })
        }

        fn saved(&self) -> Vec<SrsRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl RecordStore for MemoryStore {
        fn load_records(&self, page: usize, limit: usize) -> Fallible<Vec<SrsRecord>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .skip((page - 1) * limit)
                .take(limit)
                .cloned()
                .collect())
        }

        fn save_record(&self, id: &CardId, state: &SrsState) -> Fallible<()> {
            let mut records = self.records.lock().unwrap();
            records.retain(|r| &r.id != id);
            records.push(SrsRecord {
                id: id.clone(),
                state: *state,
            });
            Ok(())
        }
    }

    /// A record store that is always unreachable.
    struct OfflineStore;

    impl RecordStore for OfflineStore {
        fn load_records(&self, _: usize, _: usize) -> Fallible<Vec<SrsRecord>> {
            Err(ErrorReport::new("offline"))
        }

        fn save_record(&self, _: &CardId, _: &SrsState) -> Fallible<()> {
            Err(ErrorReport::new("offline"))
        }
    }

    struct BrokenCatalog;

    impl Catalog for BrokenCatalog {
        fn load_page(&self, _: Scope, _: usize, _: usize) -> Fallible<Vec<Card>> {
            Err(ErrorReport::new("catalog unavailable"))
        }
    }

    fn catalog(texts: &[&str]) -> DeckCatalog {
        DeckCatalog::new(texts.iter().map(|t| Card::new("test", t, "m")).collect())
    }

    fn future_record(text: &str) -> SrsRecord {
        SrsRecord {
            id: CardId::new(text),
            state: SrsState {
                interval: 10,
                repetition: 3,
                ease_factor: 2.5,
                next_review_due: Timestamp::from_millis(100 * MILLIS_PER_DAY),
            },
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn current(session: &Session) -> Option<&str> {
        session.current_card().map(|c| c.text())
    }

    #[test]
    fn test_guest_session() -> Fallible<()> {
        let mut session =
            Session::open(&catalog(&["a", "b"]), Scope::All, None, &Config::default())?;
        assert!(session.is_loading());
        session.start(Timestamp::EPOCH, &mut rng());
        assert!(!session.is_loading());
        assert_eq!(session.queue_length(), 2);
        assert!(session.take_syncer().is_none());
        let rated = session.rate(Rating::Pass, Timestamp::EPOCH)?;
        assert_eq!(rated.card.text(), "a");
        assert_eq!(rated.state.interval, 1);
        assert_eq!(session.state_of(&CardId::new("a")), Some(&rated.state));
        Ok(())
    }

    #[test]
    fn test_catalog_failure_propagates() {
        let result = Session::open(&BrokenCatalog, Scope::All, None, &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_seeded_from_records() -> Fallible<()> {
        let records = MemoryStore::new(vec![future_record("a")]);
        let mut session = Session::open(
            &catalog(&["a", "b"]),
            Scope::All,
            Some(records),
            &Config::default(),
        )?;
        session.start(Timestamp::EPOCH, &mut rng());
        assert_eq!(session.queue_length(), 1);
        assert_eq!(current(&session), Some("b"));
        Ok(())
    }

    #[test]
    fn test_records_limit() -> Fallible<()> {
        let records = MemoryStore::new(vec![future_record("a"), future_record("b")]);
        let config = Config {
            records_limit: 1,
            ..Config::default()
        };
        let mut session = Session::open(&catalog(&["a", "b"]), Scope::All, Some(records), &config)?;
        session.start(Timestamp::EPOCH, &mut rng());
        // Only the first record was fetched, so "b" counts as never rated.
        assert_eq!(session.queue_length(), 1);
        assert_eq!(current(&session), Some("b"));
        Ok(())
    }

    #[test]
    fn test_unreachable_record_store() -> Fallible<()> {
        let mut session = Session::open(
            &catalog(&["a"]),
            Scope::All,
            Some(Arc::new(OfflineStore)),
            &Config::default(),
        )?;
        session.start(Timestamp::EPOCH, &mut rng());
        let rated = session.rate(Rating::Easy, Timestamp::EPOCH)?;
        // Outside a runtime the save runs inline, and its failure is only logged.
        assert!(session.is_empty());
        assert_eq!(session.state_of(&CardId::new("a")), Some(&rated.state));
        Ok(())
    }

    #[tokio::test]
    async fn test_ratings_are_saved_in_the_background() -> Fallible<()> {
        let records = MemoryStore::new(Vec::new());
        let mut session = Session::open(
            &catalog(&["a", "b"]),
            Scope::All,
            Some(records.clone()),
            &Config::default(),
        )?;
        let now = Timestamp::from_millis(1000);
        session.start(now, &mut rng());
        let rated = session.rate(Rating::Pass, now)?;
        if let Some(syncer) = session.take_syncer() {
            syncer.close().await;
        }
        let saved = records.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, CardId::new("a"));
        assert_eq!(saved[0].state, rated.state);
        Ok(())
    }

    #[tokio::test]
    async fn test_last_ratings_are_saved_on_close() -> Fallible<()> {
        let records = MemoryStore::new(Vec::new());
        let texts: Vec<String> = (0..20).map(|i| format!("w{i}")).collect();
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        let mut session = Session::open(
            &catalog(&texts),
            Scope::All,
            Some(records.clone()),
            &Config::default(),
        )?;
        let now = Timestamp::from_millis(1000);
        session.start(now, &mut rng());
        while !session.is_empty() {
            session.rate(Rating::Easy, now)?;
        }
        if let Some(syncer) = session.take_syncer() {
            syncer.close().await;
        }
        assert_eq!(records.saved().len(), 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_save_does_not_block_the_session() -> Fallible<()> {
        let mut session = Session::open(
            &catalog(&["a", "b"]),
            Scope::All,
            Some(Arc::new(OfflineStore)),
            &Config::default(),
        )?;
        let now = Timestamp::from_millis(1000);
        session.start(now, &mut rng());
        let rated = session.rate(Rating::Pass, now)?;
        assert_eq!(current(&session), Some("b"));
        if let Some(syncer) = session.take_syncer() {
            syncer.close().await;
        }
        assert_eq!(session.state_of(&CardId::new("a")), Some(&rated.state));
        Ok(())
    }

    #[test]
    fn test_fail_requeues_and_resets() -> Fallible<()> {
        let mut session =
            Session::open(&catalog(&["a", "b"]), Scope::All, None, &Config::default())?;
        let now = Timestamp::from_millis(5000);
        session.start(now, &mut rng());
        let rated = session.rate(Rating::Fail, now)?;
        assert_eq!(rated.state.repetition, 0);
        assert_eq!(rated.state.next_review_due, now);
        assert_eq!(session.queue_length(), 2);
        assert_eq!(current(&session), Some("b"));
        session.rate(Rating::Pass, now)?;
        assert_eq!(current(&session), Some("a"));
        session.rate(Rating::Pass, now)?;
        assert!(session.is_empty());
        assert!(session.rate(Rating::Pass, now).is_err());
        Ok(())
    }

    #[test]
    fn test_nothing_due_vs_no_vocabulary() -> Fallible<()> {
        let records = MemoryStore::new(vec![future_record("a")]);
        let mut session =
            Session::open(&catalog(&["a"]), Scope::All, Some(records), &Config::default())?;
        session.start(Timestamp::EPOCH, &mut rng());
        assert!(session.is_empty());
        assert_eq!(session.total_available_cards(), 1);

        let mut session = Session::open(&catalog(&[]), Scope::All, None, &Config::default())?;
        session.start(Timestamp::EPOCH, &mut rng());
        assert!(session.is_empty());
        assert_eq!(session.total_available_cards(), 0);
        Ok(())
    }

    #[test]
    fn test_review_more() -> Fallible<()> {
        let records = MemoryStore::new(vec![future_record("a"), future_record("b")]);
        let mut session = Session::open(
            &catalog(&["a", "b"]),
            Scope::All,
            Some(records),
            &Config::default(),
        )?;
        session.start(Timestamp::EPOCH, &mut rng());
        assert!(session.is_empty());
        session.review_more(Timestamp::EPOCH, &mut rng())?;
        assert_eq!(session.queue_length(), 2);
        // Only allowed once the queue is empty.
        assert!(session.review_more(Timestamp::EPOCH, &mut rng()).is_err());
        Ok(())
    }

    #[test]
    fn test_review_more_with_empty_catalog() -> Fallible<()> {
        let mut session = Session::open(&catalog(&[]), Scope::All, None, &Config::default())?;
        session.start(Timestamp::EPOCH, &mut rng());
        session.review_more(Timestamp::EPOCH, &mut rng())?;
        assert!(session.is_empty());
        Ok(())
    }

    #[test]
    fn test_preview_follows_current_card() -> Fallible<()> {
        let mut session = Session::open(&catalog(&["a"]), Scope::All, None, &Config::default())?;
        assert_eq!(session.preview(Rating::Pass), None);
        let now = Timestamp::EPOCH;
        session.start(now, &mut rng());
        assert_eq!(session.preview(Rating::Fail), Some(Preview::LessThanADay));
        assert_eq!(session.preview(Rating::Pass), Some(Preview::Days(1)));
        session.rate(Rating::Fail, now)?;
        session.rate(Rating::Pass, now)?;
        assert_eq!(session.preview(Rating::Pass), None);
        Ok(())
    }

    #[test]
    fn test_saved_scope() -> Fallible<()> {
        let cards = vec![
            Card::new("test", "a", "m"),
            Card::new("test", "b", "m").with_saved(true),
        ];
        let mut session = Session::open(
            &DeckCatalog::new(cards),
            Scope::Saved,
            None,
            &Config::default(),
        )?;
        session.start(Timestamp::EPOCH, &mut rng());
        assert_eq!(session.total_available_cards(), 1);
        assert_eq!(current(&session), Some("b"));
        Ok(())
    }
}
