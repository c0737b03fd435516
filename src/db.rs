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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Transaction;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::records::RecordStore;
use crate::types::card_id::CardId;
use crate::types::srs_state::SrsRecord;
use crate::types::srs_state::SrsState;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// A row of the review log: the state a card was left in by a rating.
pub struct ReviewLogRow {
    pub card_id: CardId,
    pub reviewed_at: Timestamp,
    pub state: SrsState,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// The number of cards with a stored review state.
    pub fn record_count(&self) -> Fallible<usize> {
        let conn = self.acquire()?;
        let count: i64 = conn.query_row("select count(*) from srs_records;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The whole review log, oldest first.
    pub fn review_log(&self) -> Fallible<Vec<ReviewLogRow>> {
        let conn = self.acquire()?;
        let sql = "select card_id, reviewed_at, interval, repetition, ease_factor, next_review_due from reviews order by review_id;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut log = Vec::new();
        while let Some(row) = rows.next()? {
            log.push(ReviewLogRow {
                card_id: row.get(0)?,
                reviewed_at: row.get(1)?,
                state: SrsState {
                    interval: row.get(2)?,
                    repetition: row.get(3)?,
                    ease_factor: row.get(4)?,
                    next_review_due: row.get(5)?,
                },
            });
        }
        Ok(log)
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ErrorReport::new("database connection lock poisoned."))
    }
}

impl RecordStore for Database {
    fn load_records(&self, page: usize, limit: usize) -> Fallible<Vec<SrsRecord>> {
        if page == 0 {
            return fail("page numbers start at 1.");
        }
        let offset = (page - 1).saturating_mul(limit);
        let conn = self.acquire()?;
        let sql = "select card_id, interval, repetition, ease_factor, next_review_due from srs_records order by card_id limit ? offset ?;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query((limit as i64, offset as i64))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(SrsRecord {
                id: row.get(0)?,
                state: SrsState {
                    interval: row.get(1)?,
                    repetition: row.get(2)?,
                    ease_factor: row.get(3)?,
                    next_review_due: row.get(4)?,
                },
            });
        }
        Ok(records)
    }

    fn save_record(&self, id: &CardId, state: &SrsState) -> Fallible<()> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let now = Timestamp::now();
        upsert_record(&tx, id, state, now)?;
        insert_review(&tx, id, state, now)?;
        tx.commit()?;
        Ok(())
    }
}

fn upsert_record(tx: &Transaction, id: &CardId, state: &SrsState, now: Timestamp) -> Fallible<()> {
    let sql = "insert into srs_records (card_id, interval, repetition, ease_factor, next_review_due, updated_at) values (?, ?, ?, ?, ?, ?) on conflict (card_id) do update set interval = excluded.interval, repetition = excluded.repetition, ease_factor = excluded.ease_factor, next_review_due = excluded.next_review_due, updated_at = excluded.updated_at;";
    tx.execute(
        sql,
        (
            id,
            state.interval,
            state.repetition,
            state.ease_factor,
            state.next_review_due,
            now,
        ),
    )?;
    Ok(())
}

type ReviewId = i64;

fn insert_review(
    tx: &Transaction,
    id: &CardId,
    state: &SrsState,
    now: Timestamp,
) -> Fallible<ReviewId> {
    let sql = "insert into reviews (card_id, reviewed_at, interval, repetition, ease_factor, next_review_due) values (?, ?, ?, ?, ?, ?) returning review_id;";
    let review_id: ReviewId = tx.query_row(
        sql,
        (
            id,
            now,
            state.interval,
            state.repetition,
            state.ease_factor,
            state.next_review_due,
        ),
        |row| row.get(0),
    )?;
    Ok(review_id)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["srs_records"], |row| row.get(0))?;
    Ok(count > 0)
}
