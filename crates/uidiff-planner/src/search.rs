//! Plain-text lookups in a project checkout, used to point blueprints at real files.

use crate::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_SEARCH_HITS: usize = 10;
pub const MAX_LISTED_ENTRIES: usize = 20;

const SKIPPED_DIRS: [&str; 3] = ["node_modules", ".git", "dist"];

/// One matching line; displays as `path:line:text` like `grep -rn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub text: String,
}

impl fmt::Display for SearchHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.text)
    }
}

/// Case-sensitive substring search under `root`, at most [`MAX_SEARCH_HITS`] lines.
///
/// Skips `node_modules`, `.git`, `dist` and `*.json`; unreadable or non-UTF-8 files are
/// ignored. Files are visited in path order.
pub fn search_codebase(root: &Path, query: &str) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let mut hits = Vec::new();
    for path in source_files(root) {
        let Ok(contents) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in contents.lines().enumerate() {
            if !line.contains(query) {
                continue;
            }
            hits.push(SearchHit {
                path: path.clone(),
                line: idx + 1,
                text: line.to_string(),
            });
            if hits.len() == MAX_SEARCH_HITS {
                return hits;
            }
        }
    }
    hits
}

fn source_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                if path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIPPED_DIRS.contains(&n))
                {
                    continue;
                }
                stack.push(path);
                continue;
            }
            if path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            files.push(path);
        }
    }
    files.sort();
    files
}

/// Visible entries of `root/dir`, sorted, at most [`MAX_LISTED_ENTRIES`].
pub fn list_files(root: &Path, dir: &str) -> Result<Vec<String>> {
    let target = root.join(dir);
    if !target.exists() {
        return Err(Error::MissingDirectory { path: target });
    }
    let entries = fs::read_dir(&target).map_err(|source| Error::Io {
        path: target.clone(),
        source,
    })?;
    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|n| !n.starts_with('.') && n != "node_modules")
        .collect();
    names.sort();
    names.truncate(MAX_LISTED_ENTRIES);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn finds_lines_and_skips_vendored_dirs_and_json() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/pages/Cart.tsx", "<Button>\n  去下单\n</Button>\n");
        write(root, "node_modules/ui/index.js", "去下单");
        write(root, "dist/app.js", "去下单");
        write(root, "src/i18n/zh.json", "{\"cta\": \"去下单\"}");

        let hits = search_codebase(root, "去下单");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, root.join("src/pages/Cart.tsx"));
        assert_eq!(hits[0].line, 2);
        assert_eq!(
            hits[0].to_string(),
            format!("{}:2:  去下单", root.join("src/pages/Cart.tsx").display())
        );
    }

    #[test]
    fn caps_hits_and_ignores_blank_queries() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.txt", &"price\n".repeat(25));
        assert_eq!(search_codebase(tmp.path(), "price").len(), MAX_SEARCH_HITS);
        assert!(search_codebase(tmp.path(), "  ").is_empty());
    }

    #[test]
    fn lists_visible_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write(root, "src/b.ts", "");
        write(root, "src/a.ts", "");
        write(root, "src/.hidden", "");
        fs::create_dir_all(root.join("src/node_modules")).unwrap();
        assert_eq!(list_files(root, "src").unwrap(), ["a.ts", "b.ts"]);
        assert!(matches!(
            list_files(root, "missing"),
            Err(Error::MissingDirectory { .. })
        ));
    }
}
