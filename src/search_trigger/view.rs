use std::sync::{PoisonError, RwLock};

use maud::{html, Markup, Render};

use super::response::{EntryCount, SearchResponse};
use crate::components;

pub trait QuerySource: Send + Sync {
    fn current_value(&self) -> String;
}

pub trait ResultContainer: Send + Sync {
    fn replace(&self, view: ResultView);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub title: String,
    pub entries: EntryCount,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultView {
    rows: Vec<ResultRow>,
}

impl ResultView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| format!("{}: {} entries", row.title, row.entries))
            .collect()
    }
}

impl From<SearchResponse> for ResultView {
    fn from(response: SearchResponse) -> Self {
        Self {
            rows: response
                .into_iter()
                .map(|(title, entries)| ResultRow { title, entries })
                .collect(),
        }
    }
}

impl Render for ResultView {
    fn render(&self) -> Markup {
        html! {
            @for row in &self.rows {
                (components::result_line(&row.title, &row.entries))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SharedInput {
    value: RwLock<String>,
}

impl SharedInput {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(value.into()),
        }
    }

    pub fn set(&self, value: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = value.into();
    }
}

impl QuerySource for SharedInput {
    fn current_value(&self) -> String {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[derive(Debug, Default)]
pub struct MemoryContainer {
    view: RwLock<Option<ResultView>>,
}

impl MemoryContainer {
    pub fn current(&self) -> Option<ResultView> {
        self.view
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn markup(&self) -> String {
        self.current()
            .map(|view| view.render().into_string())
            .unwrap_or_default()
    }
}

impl ResultContainer for MemoryContainer {
    fn replace(&self, view: ResultView) {
        *self.view.write().unwrap_or_else(PoisonError::into_inner) = Some(view);
    }
}
