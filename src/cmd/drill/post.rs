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

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use serde::Deserialize;

use crate::cmd::drill::state::ServerState;
use crate::error::Fallible;
use crate::types::rating::Rating;
use crate::types::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
enum Action {
    Reveal,
    Fail,
    Pass,
    Easy,
    ReviewMore,
    End,
}

impl Action {
    pub fn rating(&self) -> Rating {
        match self {
            Action::Fail => Rating::Fail,
            Action::Pass => Rating::Pass,
            Action::Easy => Rating::Easy,
            _ => panic!("Action does not correspond to a rating"),
        }
    }
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, form.action) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
        }
    }
    Redirect::to("/")
}

fn action_handler(state: &ServerState, action: Action) -> Fallible<()> {
    let mut mutable = state.lock();
    if mutable.finished {
        return Ok(());
    }
    let now = Timestamp::now();
    match action {
        Action::Reveal => {
            if mutable.session.current_card().is_some() {
                mutable.reveal = true;
            }
        }
        Action::Fail | Action::Pass | Action::Easy => {
            if mutable.reveal {
                let rated = mutable.session.rate(action.rating(), now)?;
                log::debug!(
                    "Rated '{}' {action:?}, next review on {}.",
                    rated.card.text(),
                    rated.state.next_review_due
                );
                mutable.reveal = false;
                if mutable.session.is_empty() {
                    log::debug!("No cards left in the session.");
                }
            } else {
                log::warn!("Ignoring a rating for a card that is not revealed.");
            }
        }
        Action::ReviewMore => {
            mutable.session.review_more(now, &mut rand::rng())?;
            mutable.reveal = false;
        }
        Action::End => {
            log::debug!("Session completed");
            mutable.finished = true;
            let sender = match state.shutdown_tx.lock() {
                Ok(mut tx) => tx.take(),
                Err(_) => None,
            };
            if let Some(sender) = sender {
                let _ = sender.send(());
            }
        }
    }
    Ok(())
}
