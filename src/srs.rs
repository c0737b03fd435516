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

//! The rating engine: an SM-2 style update rule.

use std::fmt::Display;
use std::fmt::Formatter;

use crate::types::rating::Rating;
use crate::types::srs_state::SrsState;
use crate::types::timestamp::Timestamp;

/// The ease factor of a card that has never been rated.
pub const INITIAL_EASE: f64 = 2.5;

/// The ease factor never drops below this.
pub const MIN_EASE: f64 = 1.3;

/// Added to the ease factor on `Easy`.
const EASY_EASE_BONUS: f64 = 0.15;

/// Applied to the interval on `Easy`.
const EASY_INTERVAL_MULTIPLIER: f64 = 1.3;

/// The interval after the first successful review.
const FIRST_INTERVAL: u32 = 1;

/// The interval after the second successful review.
const SECOND_INTERVAL: u32 = 6;

/// Rounds a fractional number of days. Half-way values round away from
/// zero. Every interval computation goes through here.
fn round_days(days: f64) -> u32 {
    days.round() as u32
}

/// Computes the interval and ease factor a passing rating produces.
fn passing_schedule(state: &SrsState, rating: Rating) -> (u32, f64) {
    let mut interval = match state.repetition {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        _ => round_days(f64::from(state.interval) * state.ease_factor),
    };
    let mut ease_factor = state.ease_factor;
    if rating == Rating::Easy {
        ease_factor += EASY_EASE_BONUS;
        interval = round_days(f64::from(interval) * EASY_INTERVAL_MULTIPLIER);
    }
    (interval, ease_factor.max(MIN_EASE))
}

/// Computes a card's next state after being rated at `now`. A card without
/// state is treated as never rated.
pub fn apply_rating(state: Option<&SrsState>, rating: Rating, now: Timestamp) -> SrsState {
    let state: SrsState = state.copied().unwrap_or_default();
    match rating {
        Rating::Fail => SrsState {
            interval: 0,
            repetition: 0,
            ease_factor: state.ease_factor.max(MIN_EASE),
            next_review_due: now,
        },
        Rating::Pass | Rating::Easy => {
            let (interval, ease_factor) = passing_schedule(&state, rating);
            SrsState {
                interval,
                repetition: state.repetition.saturating_add(1),
                ease_factor,
                next_review_due: now.plus_days(interval),
            }
        }
    }
}

/// What choosing a rating would schedule, shown before the user commits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Preview {
    /// The card comes back within the current session.
    LessThanADay,
    /// The card comes back after this many days.
    Days(u32),
}

impl Display for Preview {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Preview::LessThanADay => write!(f, "<1d"),
            Preview::Days(days) => write!(f, "{days}d"),
        }
    }
}

/// Previews the interval a rating would produce, without changing anything.
pub fn preview_interval(state: Option<&SrsState>, rating: Rating) -> Preview {
    match rating {
        Rating::Fail => Preview::LessThanADay,
        Rating::Pass | Rating::Easy => {
            let state: SrsState = state.copied().unwrap_or_default();
            let (interval, _) = passing_schedule(&state, rating);
            Preview::Days(interval)
        }
    }
}
