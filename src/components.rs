use maud::{html, Markup, Render, DOCTYPE};

use crate::{icons, revindex::SearchResults};

pub fn layout(main_content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta http-equiv="X-UA-Compatible" content="ie=edge";
                title {"Phrase Search"}
                link rel="stylesheet" href="/assets/styles.css";
            }
            body {
                main #"main_content" { (main_content) }
                script src="https://unpkg.com/htmx.org@2.0.1" {}
            }
        }
    }
}

/// Search box wired to `/find`; a newer search aborts the one in flight.
pub fn search_page() -> Markup {
    layout(html! {
        form ."search" hx-get="/find" hx-target=".result" hx-sync="this:replace" {
            label ."search-label" {
                input ."search-input" type="search" name="phrase" placeholder="Find phrase"
                    autocomplete="off" hx-get="/find" hx-target=".result" hx-sync="closest form:replace"
                    hx-trigger="input changed delay:300ms, search";
                button ."search-button" type="submit" {(icons::search())}
            }
        }
        ."result" {}
    })
}

pub fn result_line(title: &str, entries: impl Render) -> Markup {
    html! {
        ."result-line" {
            ."result-title" {(title)":"}
            ."result-entries" {(entries)" entries"}
        }
    }
}

pub struct ResultLines<'a>(pub &'a SearchResults);

impl Render for ResultLines<'_> {
    fn render(&self) -> Markup {
        html! {
            @for (title, count) in self.0 {
                (result_line(title, count))
            }
        }
    }
}
