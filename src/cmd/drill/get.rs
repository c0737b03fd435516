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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::DOCTYPE;
use maud::Markup;
use maud::PreEscaped;
use maud::html;

use crate::cmd::drill::state::MutableState;
use crate::cmd::drill::state::ServerState;
use crate::markdown::markdown_to_html;
use crate::markdown::markdown_to_html_inline;
use crate::types::card::Card;
use crate::types::rating::Rating;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let (title, body) = {
        let mutable = state.lock();
        (page_title(&mutable), render_body(&mutable))
    };
    let html = page_template(&title, body);
    (StatusCode::OK, Html(html.into_string()))
}

fn page_template(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                link rel="stylesheet" href="/style.css";
            }
            body {
                (body)
            }
        }
    }
}

/// Shows the remaining count in the tab while a drill is under way.
fn page_title(mutable: &MutableState) -> String {
    let session = &mutable.session;
    if mutable.finished || session.current_card().is_none() {
        "wordcards".to_string()
    } else {
        format!("({}) wordcards", session.queue_length())
    }
}

fn render_body(mutable: &MutableState) -> Markup {
    let session = &mutable.session;
    if mutable.finished {
        return html! {
            div.finished {
                h1 { "Session Completed" }
            }
        };
    }
    if session.is_loading() {
        return html! {
            div.finished {
                h1 { "Loading" }
            }
        };
    }
    match session.current_card() {
        Some(card) => render_card(mutable, card),
        None if session.total_available_cards() == 0 => html! {
            div.finished {
                h1 { "No Vocabulary" }
                p { "Add some words to your collection to start reviewing." }
                form action="/" method="post" {
                    input id="end" type="submit" name="action" value="End";
                }
            }
        },
        None => html! {
            div.finished {
                h1 { "All Caught Up" }
                p { "Nothing is due right now. Come back later, or keep practicing." }
                form action="/" method="post" {
                    button id="review-more" type="submit" name="action" value="ReviewMore" {
                        "Review More"
                    }
                    input id="end" type="submit" name="action" value="End";
                }
            }
        },
    }
}

fn render_card(mutable: &MutableState, card: &Card) -> Markup {
    let session = &mutable.session;
    let progress = format!("{} left", session.queue_length());
    let front = html! {
        div.question {
            p.word { (card.text()) }
            @if let Some(reading) = card.reading() {
                p.reading { (reading) }
            }
        }
    };
    let back = if mutable.reveal {
        html! {
            div.answer .rich-text {
                (PreEscaped(markdown_to_html(card.meaning())))
                @if let Some(example) = card.example() {
                    p.example {
                        (PreEscaped(markdown_to_html_inline(example)))
                    }
                }
            }
        }
    } else {
        html! {
            div.answer .rich-text {}
        }
    };
    let card_controls = if mutable.reveal {
        html! {
            form action="/" method="post" {
                @for rating in Rating::ALL {
                    button id=(rating.as_str().to_lowercase()) type="submit" name="action" value=(rating.as_str()) {
                        (rating.as_str())
                        @if let Some(preview) = session.preview(rating) {
                            " "
                            span.preview { (preview.to_string()) }
                        }
                    }
                }
                div.spacer {}
                input id="end" type="submit" name="action" value="End";
            }
        }
    } else {
        html! {
            form action="/" method="post" {
                input id="reveal" type="submit" name="action" value="Reveal";
                div.spacer {}
                input id="end" type="submit" name="action" value="End";
            }
        }
    };
    html! {
        div.root {
            div.card {
                div.header {
                    h1 { (card.deck_name()) }
                    div.progress { (progress) }
                }
                div.content {
                    (front)
                    (back)
                }
                div.controls {
                    (card_controls)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::session::Session;
    use crate::store::ReviewStateStore;
    use crate::types::timestamp::Timestamp;

    fn state(texts: &[&str]) -> MutableState {
        let cards = texts.iter().map(|t| Card::new("test", t, "m")).collect();
        let mut session = Session::new(cards, ReviewStateStore::new(), None);
        session.start(Timestamp::EPOCH, &mut StdRng::seed_from_u64(0));
        MutableState {
            reveal: false,
            session,
            finished: false,
        }
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(&state(&["a", "b"])), "(2) wordcards");
        assert_eq!(page_title(&state(&[])), "wordcards");
        let mut finished = state(&["a"]);
        finished.finished = true;
        assert_eq!(page_title(&finished), "wordcards");
    }

    #[test]
    fn test_page_template() {
        let html = page_template("(1) wordcards", html! { p { "body" } }).into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>(1) wordcards</title>"));
        assert!(html.contains("href=\"/style.css\""));
        assert!(html.contains("<p>body</p>"));
    }
}
