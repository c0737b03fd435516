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

use std::fmt::Display;
use std::fmt::Formatter;

/// The user's self-assessment after seeing the back of a card.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rating {
    /// The user did not recall the card.
    Fail,
    /// The user recalled the card.
    Pass,
    /// The user recalled the card effortlessly.
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Fail, Rating::Pass, Rating::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Fail => "Fail",
            Rating::Pass => "Pass",
            Rating::Easy => "Easy",
        }
    }

    /// Whether the card stays in the session after this rating.
    pub fn requeues(&self) -> bool {
        *self == Rating::Fail
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
