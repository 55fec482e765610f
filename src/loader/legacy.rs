//! Best-effort recovery from legacy TypeScript data modules.
//!
//! Older content stores kept each collection as a `.ts` file exporting an
//! array of object literals. Nothing here executes or fully parses that
//! code: each brace-delimited literal without nested braces is scanned for
//! quoted `id`, `title`, `link` and `category` fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Resource;

struct LegacyPatterns {
    object: Regex,
    id: Regex,
    title: Regex,
    link: Regex,
    category: Regex,
}

impl LegacyPatterns {
    fn compile() -> Option<Self> {
        Some(Self {
            object: Regex::new(r"\{[^{}]*\}").ok()?,
            id: field_pattern("id")?,
            title: field_pattern("title")?,
            link: field_pattern("link")?,
            category: field_pattern("category")?,
        })
    }
}

/// `name: 'value'` with single, double or back quotes. Backslash escapes
/// inside the value are allowed.
fn field_pattern(name: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"(?:^|[\s,{{]){name}\s*:\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)"|`((?:[^`\\]|\\.)*)`)"#
    ))
    .ok()
}

/// Resolves escaped quotes and backslashes; other escapes are kept as written.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\'' | '"' | '`' | '\\')) => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

static PATTERNS: LazyLock<Option<LegacyPatterns>> = LazyLock::new(LegacyPatterns::compile);

fn capture(re: &Regex, block: &str) -> Option<String> {
    let caps = re.captures(block)?;
    (1..=3)
        .find_map(|i| caps.get(i))
        .map(|m| unescape(m.as_str().trim()))
}

/// Extracts resources from legacy source text.
///
/// Literals lacking any of `id`, `title` or `link` are ignored.
pub(super) fn extract_resources(source: &str) -> Vec<Resource> {
    let Some(patterns) = PATTERNS.as_ref() else {
        log::error!("Legacy extraction patterns failed to compile");
        return Vec::new();
    };

    patterns
        .object
        .find_iter(source)
        .filter_map(|block| {
            let block = block.as_str();
            let id = capture(&patterns.id, block)?;
            let title = capture(&patterns.title, block)?;
            let link = capture(&patterns.link, block)?;
            let category = capture(&patterns.category, block).filter(|c| !c.is_empty());
            Some(Resource {
                id,
                title,
                link,
                category,
            })
        })
        .collect()
}
