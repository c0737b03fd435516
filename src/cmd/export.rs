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
use crate::types::card_id::CardId;
use crate::types::srs_state::SrsState;
use crate::types::timestamp::Timestamp;

pub fn export_collection(directory: Option<String>) -> Fallible<()> {
    let coll: Collection = Collection::new(directory)?;
    let export: Export = get_export(&coll)?;
    let json: String = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Export {
    cards: Vec<CardExport>,
    reviews: Vec<ReviewExport>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardExport {
    id: CardId,
    deck_name: String,
    text: String,
    reading: Option<String>,
    meaning: String,
    example: Option<String>,
    saved: bool,
    state: Option<SrsState>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewExport {
    id: CardId,
    reviewed_at: Timestamp,
    state: SrsState,
}

fn get_export(coll: &Collection) -> Fallible<Export> {
    let record_count = coll.db.record_count()?;
    let store = ReviewStateStore::from_records(coll.db.load_records(1, record_count.max(1))?);
    let cards = coll
        .catalog
        .cards()
        .iter()
        .map(|card| CardExport {
            id: card.id().clone(),
            deck_name: card.deck_name().to_owned(),
            text: card.text().to_owned(),
            reading: card.reading().map(str::to_owned),
            meaning: card.meaning().to_owned(),
            example: card.example().map(str::to_owned),
            saved: card.is_saved(),
            state: store.get(card.id()).copied(),
        })
        .collect();
    let reviews = coll
        .db
        .review_log()?
        .into_iter()
        .map(|row| ReviewExport {
            id: row.card_id,
            reviewed_at: row.reviewed_at,
            state: row.state,
        })
        .collect();
    Ok(Export { cards, reviews })
}
