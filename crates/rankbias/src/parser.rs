use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::{Candidate, UNKNOWN_NAME};

/// Only the first page of listings is processed, and only this many entries of it.
pub const MAX_CANDIDATES: usize = 50;

static RE_PAREN_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^)]+)\)").expect("invalid regex: parenthesized location")
});

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts ranking entries from a composite rankings page.
///
/// Entries missing a name, meta line or rating container degrade to
/// `"Unknown"`, an empty location and zero stars respectively.
pub fn parse_rankings(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let recruit_sel = Selector::parse("div.recruit").unwrap();

    let items: Vec<ElementRef> = document.select(&recruit_sel).collect();
    log::info!("Found {} recruit entries", items.len());

    items
        .into_iter()
        .take(MAX_CANDIDATES)
        .enumerate()
        .map(|(idx, item)| {
            let candidate = parse_candidate(item);
            log::debug!("Entry {}: {}", idx, candidate);
            candidate
        })
        .collect()
}

fn parse_candidate(item: ElementRef) -> Candidate {
    let name_sel = Selector::parse("a.rankings-page__name-link").unwrap();
    let meta_sel = Selector::parse("span.meta").unwrap();

    let name = item
        .select(&name_sel)
        .next()
        .map(|e| normalize_whitespace(&elem_text(e)))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let location = item
        .select(&meta_sel)
        .next()
        .and_then(|e| parse_location(&elem_text(e)))
        .unwrap_or_default();

    Candidate {
        name,
        location,
        stars: count_stars(item),
    }
}

/// Pulls `"City, ST"` out of meta text such as `"Class of 2026 (City, ST)"`.
pub fn parse_location(meta_text: &str) -> Option<String> {
    RE_PAREN_LOCATION
        .captures(meta_text.trim())
        .map(|caps| caps[1].trim().to_string())
}

// The rating block is a sibling of the recruit div, so walk up to the list item.
fn count_stars(item: ElementRef) -> u32 {
    let rating_sel = Selector::parse("div.rating").unwrap();
    let star_sel = Selector::parse("span.icon-starsolid.yellow").unwrap();

    let Some(list_item) = item
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "li")
    else {
        return 0;
    };

    list_item
        .select(&rating_sel)
        .next()
        .map(|rating| rating.select(&star_sel).count() as u32)
        .unwrap_or(0)
}
