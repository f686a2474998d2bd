//! Search result types, the current result list, and display payloads.
//!
//! The store holds the full ranked list for one applied search request.
//! Rendering sees a capped view; keyboard and pointer addressing index into
//! the full list.

use serde::{Deserialize, Serialize};

use crate::highlight::highlight;

/// Characters of path shown before middle truncation kicks in.
const PATH_DISPLAY_MAX_CHARS: usize = 60;

/// The category of a search hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    App,
    File,
    Directory,
    Content,
}

impl ResultType {
    /// Fallback glyph for results without icon data.
    pub fn glyph(&self) -> &'static str {
        match self {
            ResultType::App => "◆",
            ResultType::File => "▪",
            ResultType::Directory => "▸",
            ResultType::Content => "¶",
        }
    }
}

/// One ranked search hit, immutable once received from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub result_type: ResultType,
    pub name: String,
    /// Full path for files and directories, the exec command line for apps.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_data: Option<String>,
    /// For content matches: the line containing the matched text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// For content matches: 1-based line number of the match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
    /// Provider ranking score; insertion order is rank order.
    pub score: f64,
}

/// The ranked result list for the most recently applied search request.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<SearchResult>,
    query: String,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with the results of a fresh request.
    pub fn replace(&mut self, results: Vec<SearchResult>, query: String) {
        self.results = results;
        self.query = query;
    }

    pub fn clear(&mut self) {
        self.results.clear();
        self.query.clear();
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Full-list addressing for keyboard and pointer selection.
    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    /// The capped slice handed to the presentation layer.
    pub fn visible(&self, max_rendered: usize) -> &[SearchResult] {
        &self.results[..self.results.len().min(max_rendered)]
    }

    /// The query these results were produced for.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The window is expanded only when a non-empty query has results.
    pub fn is_expanded(&self) -> bool {
        !self.results.is_empty() && !self.query.is_empty()
    }
}

/// Per-item display payload for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayItem {
    /// Icon data URL when the provider supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Type glyph fallback, always present.
    pub glyph: String,
    /// Result name with query matches wrapped in `<strong>`.
    pub name: String,
    /// Highlighted context line, when the result has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Middle-truncated path for display.
    pub path: String,
}

/// Build the capped, highlighted display payload for the current store.
pub fn display_items(store: &ResultStore, max_rendered: usize) -> Vec<DisplayItem> {
    let query = store.query();
    store
        .visible(max_rendered)
        .iter()
        .map(|result| DisplayItem {
            icon: result.icon_data.clone(),
            glyph: result.result_type.glyph().to_string(),
            name: highlight(&result.name, query),
            subtitle: result.context.as_deref().map(|ctx| highlight(ctx, query)),
            path: truncate_path(&result.path, PATH_DISPLAY_MAX_CHARS),
        })
        .collect()
}

/// Middle-ellipsis truncation, safe on multi-byte characters.
pub fn truncate_path(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let head = keep / 2;
    let tail = keep - head;
    let head_str: String = path.chars().take(head).collect();
    let tail_str: String = path.chars().skip(count - tail).collect();
    format!("{head_str}…{tail_str}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str) -> SearchResult {
        SearchResult {
            result_type: ResultType::File,
            name: name.to_string(),
            path: format!("/home/user/{name}"),
            icon_data: None,
            context: None,
            line_number: None,
            score: 1.0,
        }
    }

    #[test]
    fn test_visible_caps_but_full_set_is_addressable() {
        let mut store = ResultStore::new();
        let results: Vec<SearchResult> = (0..150).map(|i| result(&format!("r{i}"))).collect();
        store.replace(results, "r".to_string());

        assert_eq!(store.visible(100).len(), 100);
        assert_eq!(store.len(), 150);
        assert_eq!(store.get(149).unwrap().name, "r149");
        assert!(store.get(150).is_none());
    }

    #[test]
    fn test_expanded_requires_query_and_results() {
        let mut store = ResultStore::new();
        assert!(!store.is_expanded());

        store.replace(vec![result("a")], "a".to_string());
        assert!(store.is_expanded());

        store.replace(Vec::new(), "zzz".to_string());
        assert!(!store.is_expanded());

        store.clear();
        assert!(!store.is_expanded());
    }

    #[test]
    fn test_display_items_highlight_name_and_subtitle() {
        let mut store = ResultStore::new();
        let mut hit = result("notes.txt");
        hit.result_type = ResultType::Content;
        hit.context = Some("remember the notes".to_string());
        hit.line_number = Some(3);
        store.replace(vec![hit], "note".to_string());

        let items = display_items(&store, 100);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "<strong>note</strong>s.txt");
        assert_eq!(
            items[0].subtitle.as_deref(),
            Some("remember the <strong>note</strong>s")
        );
        assert_eq!(items[0].glyph, "¶");
    }

    #[test]
    fn test_truncate_path_short_is_untouched() {
        assert_eq!(truncate_path("/tmp/a", 60), "/tmp/a");
    }

    #[test]
    fn test_truncate_path_keeps_head_and_tail() {
        let long = format!("/home/user/{}/notes.txt", "deep/".repeat(30));
        let shown = truncate_path(&long, 20);
        assert_eq!(shown.chars().count(), 20);
        assert!(shown.starts_with("/home/use"));
        assert!(shown.ends_with("notes.txt"));
        assert!(shown.contains('…'));
    }

    #[test]
    fn test_result_type_wire_names() {
        assert_eq!(serde_json::to_string(&ResultType::App).unwrap(), "\"app\"");
        assert_eq!(
            serde_json::to_string(&ResultType::Directory).unwrap(),
            "\"directory\""
        );
    }
}
