//! Import extraction and origin classification
//!
//! This is a text heuristic, not a parser: quoted strings or comments that
//! look like import declarations are picked up as imports. Namespace matching
//! is a plain prefix test, so `golang.org/x/netutil` counts as part of
//! `golang.org/x/net`.

use std::sync::LazyLock;

use regex::Regex;

/// Dotted namespaces shipped alongside the standard library
pub const EXTENDED_STANDARD_NAMESPACES: &[&str] = &[
    "golang.org/x/crypto",
    "golang.org/x/net",
    "golang.org/x/text",
    "golang.org/x/sys",
    "golang.org/x/time",
];

static SINGLE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s+(?:[A-Za-z_.]\w*\s+)?(?:"([^"]+)"|`([^`]+)`)"#).unwrap()
});

/// `import ( ... )` block; a `)` inside a `//` comment does not close it
static GROUPED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bimport\s*\(((?:[^)/]|/[^/)]|//[^\n]*)*)\)").unwrap()
});

static QUOTED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|`([^`]+)`"#).unwrap());

/// Where an import path is resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOrigin {
    /// Bare or slash-separated path without a domain-style dot
    StandardLibrary,
    /// Dotted path under a known first-party namespace
    ExtendedStandard,
    /// `./` or `../` relative package
    RelativeLocal,
    /// Anything else; needs dependency resolution
    External,
}

impl ImportOrigin {
    /// Whether the toolchain can resolve this import without a module
    pub fn is_standard_library(&self) -> bool {
        matches!(
            self,
            ImportOrigin::StandardLibrary | ImportOrigin::ExtendedStandard
        )
    }
}

/// Classify an import path.
///
/// Rules apply in order: no dot, known namespace, relative prefix, external.
/// Unknown spellings fall through to [`ImportOrigin::External`], which is the
/// conservative answer (a module gets required rather than a no-module run
/// failing).
pub fn classify_import_origin<S: AsRef<str>>(path: &str, extended: &[S]) -> ImportOrigin {
    if !path.contains('.') {
        return ImportOrigin::StandardLibrary;
    }

    if EXTENDED_STANDARD_NAMESPACES.iter().any(|ns| path.starts_with(ns))
        || extended.iter().any(|ns| path.starts_with(ns.as_ref()))
    {
        return ImportOrigin::ExtendedStandard;
    }

    if path.starts_with("./") || path.starts_with("../") {
        return ImportOrigin::RelativeLocal;
    }

    ImportOrigin::External
}

/// Extract every import path declared in `source`, in order of appearance.
///
/// Handles `import "p"`, aliased `import name "p"`, raw `` import `p` `` and
/// grouped `import ( ... )` blocks.
pub fn extract_imports(source: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for caps in SINGLE_IMPORT.captures_iter(source) {
        if let Some(path) = caps.get(1).or_else(|| caps.get(2)) {
            found.push((path.start(), path.as_str().to_string()));
        }
    }

    for block in GROUPED_IMPORT.captures_iter(source) {
        let Some(body) = block.get(1) else { continue };
        let mut line_start = body.start();
        for line in body.as_str().split('\n') {
            let code = line.split_once("//").map_or(line, |(code, _)| code);
            for caps in QUOTED_PATH.captures_iter(code) {
                if let Some(path) = caps.get(1).or_else(|| caps.get(2)) {
                    found.push((line_start + path.start(), path.as_str().to_string()));
                }
            }
            line_start += line.len() + 1;
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, path)| path).collect()
}
