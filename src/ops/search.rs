use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::model::task::TaskState;
use crate::render::view::{BoardView, CardView};

/// Queries shorter than this (after trimming) do not filter anything
pub const MIN_QUERY_CHARS: usize = 2;

/// Placeholder shown in a column whose cards are all filtered out
pub const NO_RESULTS: &str = "No tasks found";

/// A board search query: trimmed, matched case-insensitively as a plain
/// substring against card titles and descriptions.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    text: String,
    re: Option<Regex>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let re = if text.chars().count() >= MIN_QUERY_CHARS {
            RegexBuilder::new(&regex::escape(&text))
                .case_insensitive(true)
                .build()
                .ok()
        } else {
            None
        };
        SearchQuery { text, re }
    }

    /// No query at all
    pub fn empty() -> Self {
        SearchQuery::parse("")
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the query is long enough to filter
    pub fn is_active(&self) -> bool {
        self.re.is_some()
    }

    /// Byte ranges of every match in `haystack`
    pub fn find(&self, haystack: &str) -> Vec<Range<usize>> {
        match &self.re {
            Some(re) => re.find_iter(haystack).map(|m| m.start()..m.end()).collect(),
            None => Vec::new(),
        }
    }
}

/// A card with its search outcome
#[derive(Debug, Clone)]
pub struct SearchedCard<'a> {
    pub card: &'a CardView,
    pub visible: bool,
    pub title_hits: Vec<Range<usize>>,
    pub description_hits: Vec<Range<usize>>,
}

#[derive(Debug, Clone)]
pub struct SearchedColumn<'a> {
    pub state: TaskState,
    pub label: &'static str,
    pub cards: Vec<SearchedCard<'a>>,
    /// Show the "no results" placeholder instead of cards
    pub no_results: bool,
}

impl<'a> SearchedColumn<'a> {
    pub fn visible_cards(&self) -> impl Iterator<Item = &SearchedCard<'a>> {
        self.cards.iter().filter(|c| c.visible)
    }
}

/// The board as filtered by a query
#[derive(Debug, Clone)]
pub struct SearchedBoard<'a> {
    pub active: bool,
    pub columns: Vec<SearchedColumn<'a>>,
}

impl SearchedBoard<'_> {
    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(|c| c.visible_cards().count()).sum()
    }
}

/// Filter and highlight the rendered board.
///
/// An inactive query shows every card without highlights. An active query
/// shows the cards whose title or description contains it, and a column
/// left with no visible cards gets the placeholder. Rebuilding the board
/// view after a reload and calling this again reapplies the query.
pub fn apply_search<'a>(board: &'a BoardView, query: &SearchQuery) -> SearchedBoard<'a> {
    let active = query.is_active();
    let columns = board
        .columns
        .iter()
        .map(|col| {
            let cards: Vec<SearchedCard<'a>> = col
                .cards
                .iter()
                .map(|card| {
                    let title_hits = query.find(&card.title);
                    let description_hits = query.find(&card.description);
                    SearchedCard {
                        card,
                        visible: !active || !title_hits.is_empty() || !description_hits.is_empty(),
                        title_hits,
                        description_hits,
                    }
                })
                .collect();
            let no_results = active && !cards.iter().any(|c| c.visible);
            SearchedColumn {
                state: col.state,
                label: col.label,
                cards,
                no_results,
            }
        })
        .collect();
    SearchedBoard { active, columns }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
