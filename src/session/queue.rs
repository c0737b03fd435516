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

use std::collections::VecDeque;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;
use crate::types::rating::Rating;

/// The cards of a session, in the order they will be shown.
enum QueueState {
    /// Waiting for the queue to be built.
    Loading,
    /// The front card is the one being shown.
    Active(VecDeque<Card>),
    /// Nothing left to review.
    Empty,
}

pub struct SessionQueue {
    state: QueueState,
}

impl SessionQueue {
    pub fn new() -> Self {
        Self {
            state: QueueState::Loading,
        }
    }

    /// Replaces the queue with a freshly selected one.
    pub fn fill(&mut self, cards: Vec<Card>) {
        self.state = if cards.is_empty() {
            QueueState::Empty
        } else {
            QueueState::Active(cards.into())
        };
    }

    pub fn current_card(&self) -> Option<&Card> {
        match &self.state {
            QueueState::Active(cards) => cards.front(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match &self.state {
            QueueState::Active(cards) => cards.len(),
            _ => 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, QueueState::Loading)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, QueueState::Empty)
    }

    /// Takes the current card off the front of the queue. A failed card goes
    /// to the back; any other card leaves the session. Returns the card that
    /// was rated.
    pub fn advance(&mut self, rating: Rating) -> Fallible<Card> {
        let cards = match &mut self.state {
            QueueState::Active(cards) => cards,
            QueueState::Loading => return fail("the session has not started."),
            QueueState::Empty => return fail("there is no card to rate."),
        };
        let card = match cards.pop_front() {
            Some(card) => card,
            None => return fail("there is no card to rate."),
        };
        if rating.requeues() {
            cards.push_back(card.clone());
        }
        if cards.is_empty() {
            self.state = QueueState::Empty;
        }
        Ok(card)
    }
}
