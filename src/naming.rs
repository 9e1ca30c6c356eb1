//! Unique output-filename allocation for stored payloads.
//!
//! Names are derived deterministically from the seed and row index, then
//! disambiguated against the run's used-name set so that no name is ever
//! returned twice within one batch.

use std::collections::HashSet;

use crate::types::Seed;

/// Extension appended when a derived name carries none
const DEFAULT_EXTENSION: &str = "jpg";

/// Allocate a unique output filename for the given seed.
///
/// The base name comes from the seed URL's last path segment (sanitized,
/// query-stripped) or the local file's own name; degenerate seeds fall back
/// to an index-derived name. On collision a ` (n)` suffix is inserted before
/// the extension and incremented until the name is unique. The returned name
/// is added to `used` before returning.
pub fn allocate(seed: &Seed, index: usize, used: &mut HashSet<String>) -> String {
    let base = derive_base(seed, index);
    let (stem, extension) = split_extension(&base);

    let mut candidate = base.clone();
    let mut attempt = 1u32;
    while used.contains(&candidate) {
        candidate = match extension {
            Some(ext) => format!("{stem} ({attempt}).{ext}"),
            None => format!("{stem} ({attempt})"),
        };
        attempt += 1;
    }

    used.insert(candidate.clone());
    candidate
}

/// Derive the deterministic base name for a seed.
fn derive_base(seed: &Seed, index: usize) -> String {
    match seed {
        Seed::File(file) if !file.name.is_empty() => ensure_extension(sanitize(&file.name)),
        Seed::File(_) => fallback_name(index),
        Seed::Url(raw) => base_from_url(raw).unwrap_or_else(|| fallback_name(index)),
    }
}

fn base_from_url(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()?
        .to_string();

    let name = sanitize(&segment);
    if name.trim_matches(['.', '_']).is_empty() {
        return None;
    }
    Some(ensure_extension(name))
}

fn fallback_name(index: usize) -> String {
    format!("image_{:05}.{}", index + 1, DEFAULT_EXTENSION)
}

/// Replace characters unsafe for filenames, keeping alphanumerics,
/// dots, dashes and underscores.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn ensure_extension(name: String) -> String {
    let has_extension = matches!(
        name.rsplit_once('.'),
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty()
    );
    if has_extension {
        name
    } else {
        format!("{}.{}", name.trim_end_matches('.'), DEFAULT_EXTENSION)
    }
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocalFile;
    use std::sync::Arc;

    fn url_seed(url: &str) -> Seed {
        Seed::Url(url.to_string())
    }

    #[test]
    fn derives_name_from_the_last_url_path_segment() {
        let mut used = HashSet::new();
        let name = allocate(&url_seed("https://example.com/photos/cat.jpg"), 0, &mut used);
        assert_eq!(name, "cat.jpg");
    }

    #[test]
    fn query_string_does_not_leak_into_the_name() {
        let mut used = HashSet::new();
        let name = allocate(
            &url_seed("https://example.com/cat.jpg?size=large&v=2"),
            0,
            &mut used,
        );
        assert_eq!(name, "cat.jpg", "query parameters must be stripped");
    }

    #[test]
    fn missing_extension_gets_the_default() {
        let mut used = HashSet::new();
        let name = allocate(&url_seed("https://example.com/photos/cat"), 0, &mut used);
        assert_eq!(name, "cat.jpg");
    }

    #[test]
    fn degenerate_url_falls_back_to_an_index_derived_name() {
        let mut used = HashSet::new();
        assert_eq!(
            allocate(&url_seed("https://example.com/"), 4, &mut used),
            "image_00005.jpg"
        );
        assert_eq!(
            allocate(&url_seed("not a url at all"), 0, &mut used),
            "image_00001.jpg"
        );
    }

    #[test]
    fn colliding_seeds_get_suffixed_names_until_unique() {
        let mut used = HashSet::new();
        let first = allocate(&url_seed("https://example.com/cat.jpg"), 0, &mut used);
        let second = allocate(&url_seed("https://example.com/cat.jpg"), 1, &mut used);
        let third = allocate(&url_seed("https://example.com/cat.jpg"), 2, &mut used);

        assert_eq!(first, "cat.jpg");
        assert_eq!(second, "cat (1).jpg");
        assert_eq!(third, "cat (2).jpg");
    }

    #[test]
    fn every_allocation_is_distinct_even_with_identical_seeds() {
        let mut used = HashSet::new();
        let names: Vec<String> = (0..25)
            .map(|i| allocate(&url_seed("https://example.com/same.png"), i, &mut used))
            .collect();

        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(
            unique.len(),
            names.len(),
            "allocator must never return the same name twice within a run"
        );
        assert_eq!(used.len(), names.len());
    }

    #[test]
    fn allocation_records_the_name_in_the_used_set() {
        let mut used = HashSet::new();
        let name = allocate(&url_seed("https://example.com/cat.jpg"), 0, &mut used);
        assert!(used.contains(&name));
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        let mut used = HashSet::new();
        let name = allocate(
            &url_seed("https://example.com/we%20ird%7Cname.png"),
            0,
            &mut used,
        );
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ' | '(' | ')')),
            "allocated name contains unsafe characters: {name}"
        );
    }

    #[test]
    fn file_seeds_reuse_the_file_name() {
        let mut used = HashSet::new();
        let file = Arc::new(LocalFile::new("holiday.png", "image/png", vec![]));
        assert_eq!(allocate(&Seed::File(file), 0, &mut used), "holiday.png");
    }
}
