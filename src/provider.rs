//! The unified search provider: applications, file names, file contents.
//!
//! One query fans out over three sources and comes back as a single ranked
//! list:
//! - Desktop applications, scored by name and exec line, boosted well above
//!   file hits
//! - File and directory names under the configured search root, walked
//!   gitignore-aware with heavy build/cache directories pruned
//! - File contents for longer queries, first matching line per file with a
//!   context snippet
//!
//! Match scoring delegates to `nucleo-matcher`; the walks are bounded so a
//! huge home directory cannot stall a keystroke's search for long.

use std::cmp::Ordering;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use async_trait::async_trait;
use ignore::WalkBuilder;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Matcher, Utf32Str};
use tracing::debug;

use crate::config::Config;
use crate::desktop_entries::{self, AppEntry};
use crate::error::{HyperlaunchError, Result};
use crate::results::{ResultType, SearchResult};
use crate::traits::SearchProvider;

/// Multiplier putting application matches ahead of file-name matches.
const APP_SCORE_WEIGHT: f64 = 20.0;
/// Penalty for hits inside dot-directories like `~/.config`.
const HIDDEN_TREE_PENALTY: f64 = 0.1;
/// Flat score for content matches; they rank below good name matches.
const CONTENT_SCORE: f64 = 10.0;

const FILE_NAME_RESULT_LIMIT: usize = 20;
const FILE_WALK_MAX_DEPTH: usize = 4;
const FILE_WALK_MAX_VISITS: usize = 5000;

const CONTENT_RESULT_LIMIT: usize = 15;
const CONTENT_WALK_MAX_DEPTH: usize = 3;
const CONTENT_MAX_FILES: usize = 2000;
const CONTENT_MAX_LINES: usize = 500;
const CONTENT_SNIPPET_MAX_CHARS: usize = 100;

/// Directories never worth descending into.
fn is_pruned(name: &std::ffi::OsStr) -> bool {
    let Some(name) = name.to_str() else {
        return false;
    };
    matches!(
        name,
        "node_modules"
            | ".cargo"
            | "target"
            | "build"
            | "dist"
            | ".npm"
            | ".cache"
            | "__pycache__"
            | ".venv"
            | "venv"
            | ".git"
            | ".gradle"
            | ".m2"
            | ".ivy2"
            | "pkg"
            | "vendor"
            | "deps"
            | "Pods"
            | ".tox"
            | ".pytest_cache"
    )
}

/// Fuzzy-match context reusing pattern, matcher, and buffer across calls.
struct ScoreCtx {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
}

impl ScoreCtx {
    fn new(query: &str) -> Self {
        ScoreCtx {
            pattern: Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart),
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            buf: Vec::with_capacity(64),
        }
    }

    fn score(&mut self, haystack: &str) -> Option<u32> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }
}

#[derive(Debug, Clone)]
pub struct UnifiedSearchProvider {
    root: PathBuf,
    app_dirs: Vec<PathBuf>,
    max_results: usize,
    content_min_chars: usize,
    content_max_file_bytes: u64,
}

impl UnifiedSearchProvider {
    pub fn new(config: &Config) -> Self {
        UnifiedSearchProvider {
            root: config.search_root(),
            app_dirs: desktop_entries::desktop_dirs(),
            max_results: config.max_results,
            content_min_chars: config.content_search_min_chars,
            content_max_file_bytes: config.content_search_max_file_bytes,
        }
    }

    fn run_search(&self, query: &str) -> Vec<SearchResult> {
        let mut results = self.search_apps(query);

        for mut hit in self.search_files_by_name(query, FILE_NAME_RESULT_LIMIT) {
            let penalty = if hit.path.contains("/.config/")
                || hit.path.contains("/.local/")
                || hit.path.contains("/.cache/")
            {
                HIDDEN_TREE_PENALTY
            } else {
                1.0
            };
            hit.score *= penalty;
            results.push(hit);
        }

        if query.chars().count() >= self.content_min_chars {
            results.extend(self.search_file_contents(query, CONTENT_RESULT_LIMIT));
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(self.max_results);
        debug!(query = %query, count = results.len(), "unified search finished");
        results
    }

    fn search_apps(&self, query: &str) -> Vec<SearchResult> {
        let mut ctx = ScoreCtx::new(query);
        let mut results = Vec::new();
        for app in desktop_entries::collect_entries(&self.app_dirs) {
            let AppEntry {
                name,
                exec,
                icon_data,
            } = app;
            let best = match (ctx.score(&name), ctx.score(&exec)) {
                (None, None) => continue,
                (a, b) => a.unwrap_or(0).max(b.unwrap_or(0)),
            };
            results.push(SearchResult {
                result_type: ResultType::App,
                name,
                path: exec.clone(),
                icon_data,
                context: Some(exec),
                line_number: None,
                score: best as f64 * APP_SCORE_WEIGHT,
            });
        }
        results
    }

    fn search_files_by_name(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let mut ctx = ScoreCtx::new(query);
        let mut results = Vec::new();
        let mut visited = 0usize;

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .max_depth(Some(FILE_WALK_MAX_DEPTH))
            .filter_entry(|entry| !is_pruned(entry.file_name()))
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            visited += 1;
            if visited > FILE_WALK_MAX_VISITS {
                break;
            }
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(score) = ctx.score(name) else {
                continue;
            };
            let result_type = if path.is_dir() {
                ResultType::Directory
            } else {
                ResultType::File
            };
            results.push(SearchResult {
                result_type,
                name: name.to_string(),
                path: path.to_string_lossy().into_owned(),
                icon_data: None,
                context: None,
                line_number: None,
                score: score as f64,
            });
            // Keep walking a bit past the limit so ranking has choices.
            if results.len() >= limit * 2 {
                break;
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(limit);
        results
    }

    fn search_file_contents(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query_lower = query.to_lowercase();
        let mut results = Vec::new();
        let mut files_checked = 0usize;

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .max_depth(Some(CONTENT_WALK_MAX_DEPTH))
            .filter_entry(|entry| !is_pruned(entry.file_name()))
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            files_checked += 1;
            if files_checked > CONTENT_MAX_FILES {
                break;
            }
            if let Ok(meta) = path.metadata() {
                if meta.len() > self.content_max_file_bytes {
                    continue;
                }
            }
            let Ok(file) = fs::File::open(path) else {
                continue;
            };
            for (line_idx, line) in BufReader::new(file)
                .lines()
                .take(CONTENT_MAX_LINES)
                .enumerate()
            {
                // Unreadable lines usually mean a binary file; move on.
                let Ok(line) = line else {
                    break;
                };
                if line.to_lowercase().contains(&query_lower) {
                    results.push(SearchResult {
                        result_type: ResultType::Content,
                        name: path
                            .file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("unknown")
                            .to_string(),
                        path: path.to_string_lossy().into_owned(),
                        icon_data: None,
                        context: Some(snippet(&line)),
                        line_number: Some(line_idx + 1),
                        score: CONTENT_SCORE,
                    });
                    break; // first match per file only
                }
            }
            if results.len() >= limit {
                break;
            }
        }
        results
    }
}

fn snippet(line: &str) -> String {
    if line.chars().count() > CONTENT_SNIPPET_MAX_CHARS {
        let truncated: String = line.chars().take(CONTENT_SNIPPET_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        line.to_string()
    }
}

#[async_trait]
impl SearchProvider for UnifiedSearchProvider {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let provider = self.clone();
        let results = tokio::task::spawn_blocking(move || provider.run_search(&query))
            .await
            .map_err(|e| HyperlaunchError::Provider(e.to_string()))?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(root: &std::path::Path) -> UnifiedSearchProvider {
        UnifiedSearchProvider {
            root: root.to_path_buf(),
            app_dirs: Vec::new(), // no desktop entries in tests
            max_results: 50,
            content_min_chars: 4,
            content_max_file_bytes: 500_000,
        }
    }

    #[tokio::test]
    async fn test_empty_query_returns_no_results_without_walking() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for(dir.path());
        assert!(provider.search("").await.unwrap().is_empty());
        assert!(provider.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_finds_files_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("firefox_notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("unrelated.txt"), "x").unwrap();

        let provider = provider_for(dir.path());
        let results = provider.search("firefox").await.unwrap();
        assert!(results
            .iter()
            .any(|r| r.name == "firefox_notes.txt" && r.result_type == ResultType::File));
        assert!(results.iter().all(|r| r.name != "unrelated.txt"));
    }

    #[tokio::test]
    async fn test_finds_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("projects")).unwrap();

        let provider = provider_for(dir.path());
        let results = provider.search("proj").await.unwrap();
        assert!(results
            .iter()
            .any(|r| r.name == "projects" && r.result_type == ResultType::Directory));
    }

    #[tokio::test]
    async fn test_content_match_has_context_and_line_number() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("todo.txt"),
            "first line\nthe meeting agenda item\nlast line\n",
        )
        .unwrap();

        let provider = provider_for(dir.path());
        let results = provider.search("agenda").await.unwrap();
        let content = results
            .iter()
            .find(|r| r.result_type == ResultType::Content)
            .expect("content match");
        assert_eq!(content.line_number, Some(2));
        assert_eq!(content.context.as_deref(), Some("the meeting agenda item"));
    }

    #[tokio::test]
    async fn test_short_query_skips_content_search() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "abc inside\n").unwrap();

        let provider = provider_for(dir.path());
        let results = provider.search("abc").await.unwrap();
        assert!(results
            .iter()
            .all(|r| r.result_type != ResultType::Content));
    }

    #[tokio::test]
    async fn test_pruned_directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let modules = dir.path().join("node_modules");
        std::fs::create_dir(&modules).unwrap();
        std::fs::write(modules.join("firefox_dep.js"), "x").unwrap();

        let provider = provider_for(dir.path());
        let results = provider.search("firefox").await.unwrap();
        assert!(results.iter().all(|r| !r.path.contains("node_modules")));
    }

    #[test]
    fn test_snippet_truncates_long_lines() {
        let long = "x".repeat(300);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), CONTENT_SNIPPET_MAX_CHARS + 3);
        assert!(s.ends_with("..."));
        assert_eq!(snippet("short"), "short");
    }
}
