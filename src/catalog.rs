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
use crate::error::fail;
use crate::types::card::Card;

/// Which part of the vocabulary a session draws from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Scope {
    /// Every card.
    All,
    /// Only the cards the user has saved.
    Saved,
}

/// A paged source of cards.
pub trait Catalog {
    /// Loads one page of cards. Pages are numbered from 1. A page shorter
    /// than `limit` is the last one.
    fn load_page(&self, scope: Scope, page: usize, limit: usize) -> Fallible<Vec<Card>>;
}

/// Loads every card in scope, one page at a time.
pub fn load_catalog(catalog: &dyn Catalog, scope: Scope, page_size: usize) -> Fallible<Vec<Card>> {
    if page_size == 0 {
        return fail("catalog page size must be positive.");
    }
    let mut cards = Vec::new();
    let mut page = 1;
    loop {
        let batch = catalog.load_page(scope, page, page_size)?;
        let last = batch.len() < page_size;
        cards.extend(batch);
        if last {
            break;
        }
        page += 1;
    }
    log::debug!("Loaded {} cards in {} pages.", cards.len(), page);
    Ok(cards)
}

/// The catalog of a vocabulary collection on disk.
pub struct DeckCatalog {
    cards: Vec<Card>,
}

impl DeckCatalog {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Catalog for DeckCatalog {
    fn load_page(&self, scope: Scope, page: usize, limit: usize) -> Fallible<Vec<Card>> {
        if page == 0 {
            return fail("page numbers start at 1.");
        }
        let cards = self
            .cards
            .iter()
            .filter(|card| match scope {
                Scope::All => true,
                Scope::Saved => card.is_saved(),
            })
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();
        Ok(cards)
    }
}
