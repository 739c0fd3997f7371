//! Hidden-reasoning stripping and best-effort JSON extraction from raw
//! planner responses.
//!
//! Models asked to "think before answering" commonly wrap that reasoning in
//! `<think>`, `<thought>`, or `<reasoning>` tags ahead of the JSON object we
//! actually want. [`strip_hidden_reasoning`] removes every such block
//! (case-insensitive, tolerant of inner whitespace, repeated until none
//! remain), and [`extract_json`] tries a direct parse of what's left before
//! falling back to a brace-depth scan for the last balanced top-level
//! object — a small scanner, not a JSON tokenizer, since malformed trailing
//! prose is common and only the object itself needs to parse cleanly.

use serde_json::Value;

const REASONING_TAGS: [&str; 3] = ["think", "thought", "reasoning"];

/// Remove every paired hidden-reasoning block from `text`.
#[must_use]
pub fn strip_hidden_reasoning(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    while let Some((start, end)) = find_paired_block(&chars) {
        chars.drain(start..end);
    }
    chars.into_iter().collect()
}

/// A single `<tag>` or `</tag>` match: the index just past its closing `>`,
/// the tag name, and whether it was a closing tag.
struct TagMatch {
    end: usize,
    name: &'static str,
    closing: bool,
}

fn parse_tag_at(chars: &[char], lt_idx: usize) -> Option<TagMatch> {
    let mut i = lt_idx.saturating_add(1);
    let closing = if chars.get(i) == Some(&'/') {
        i = i.saturating_add(1);
        true
    } else {
        false
    };
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i = i.saturating_add(1);
    }
    for tag in REASONING_TAGS {
        let tag_len = tag.chars().count();
        let name_end = i.saturating_add(tag_len);
        let Some(slice) = chars.get(i..name_end) else {
            continue;
        };
        if slice.len() != tag_len || !slice.iter().zip(tag.chars()).all(|(c, t)| c.to_ascii_lowercase() == t) {
            continue;
        }
        let mut j = name_end;
        while chars.get(j).is_some_and(|c| c.is_whitespace()) {
            j = j.saturating_add(1);
        }
        if chars.get(j) == Some(&'>') {
            return Some(TagMatch {
                end: j.saturating_add(1),
                name: tag,
                closing,
            });
        }
    }
    None
}

fn find_paired_block(chars: &[char]) -> Option<(usize, usize)> {
    let mut i = 0;
    while i < chars.len() {
        if chars.get(i) == Some(&'<') {
            if let Some(open) = parse_tag_at(chars, i) {
                if !open.closing {
                    if let Some(close_end) = find_closing_tag(chars, open.end, open.name) {
                        return Some((i, close_end));
                    }
                }
            }
        }
        i = i.saturating_add(1);
    }
    None
}

fn find_closing_tag(chars: &[char], from: usize, name: &str) -> Option<usize> {
    let mut j = from;
    while j < chars.len() {
        if chars.get(j) == Some(&'<') {
            if let Some(close) = parse_tag_at(chars, j) {
                if close.closing && close.name == name {
                    return Some(close.end);
                }
            }
        }
        j = j.saturating_add(1);
    }
    None
}

/// Strip hidden reasoning, then parse the remainder as JSON, falling back to
/// the last balanced top-level `{...}` block if a direct parse fails.
#[must_use]
pub fn extract_json(raw: &str) -> Option<Value> {
    let cleaned = strip_hidden_reasoning(raw);
    let trimmed = cleaned.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }
    let candidate = last_balanced_object(trimmed)?;
    serde_json::from_str(&candidate).ok()
}

fn last_balanced_object(text: &str) -> Option<String> {
    let mut depth: u32 = 0;
    let mut start: Option<usize> = None;
    let mut last: Option<(usize, usize)> = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(idx);
                }
                depth = depth.saturating_add(1);
            }
            '}' => {
                if depth > 0 {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        if let Some(s) = start {
                            last = Some((s, idx.saturating_add(ch.len_utf8())));
                            start = None;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    let (s, e) = last?;
    text.get(s..e).map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_single_think_block() {
        let raw = "<think>I should move east.</think>{\"tool\":\"wait\",\"params\":{}}";
        assert_eq!(strip_hidden_reasoning(raw), "{\"tool\":\"wait\",\"params\":{}}");
    }

    #[test]
    fn strips_repeatedly_across_multiple_blocks() {
        let raw = "<think>a</think><reasoning>b</reasoning>{\"tool\":\"wait\",\"params\":{}}";
        assert_eq!(strip_hidden_reasoning(raw), "{\"tool\":\"wait\",\"params\":{}}");
    }

    #[test]
    fn tag_matching_is_case_insensitive_and_tolerates_inner_whitespace() {
        let raw = "< THINK >reasoning here</ think >{\"tool\":\"wait\",\"params\":{}}";
        assert_eq!(strip_hidden_reasoning(raw), "{\"tool\":\"wait\",\"params\":{}}");
    }

    #[test]
    fn unmatched_open_tag_is_left_alone() {
        let raw = "<think>no closing tag{\"tool\":\"wait\",\"params\":{}}";
        assert_eq!(strip_hidden_reasoning(raw), raw);
    }

    #[test]
    fn extract_json_parses_directly_after_stripping() {
        let raw = "<think>hmm</think>{\"tool\":\"move\",\"params\":{\"target_location\":\"market_square\"}}";
        let value = extract_json(raw).expect("parses");
        assert_eq!(value["tool"], "move");
    }

    #[test]
    fn extract_json_falls_back_to_the_last_balanced_object() {
        let raw = "Sure, here you go: {\"tool\":\"wait\",\"params\":{}} -- hope that helps!";
        let value = extract_json(raw).expect("parses via fallback");
        assert_eq!(value["tool"], "wait");
    }

    #[test]
    fn extract_json_picks_the_last_top_level_object_when_several_appear() {
        let raw = "{\"ignored\":true} then {\"tool\":\"rest\",\"params\":{\"ticks\":2}}";
        let value = extract_json(raw).expect("parses");
        assert_eq!(value["tool"], "rest");
    }

    #[test]
    fn extract_json_returns_none_for_unparseable_garbage() {
        assert!(extract_json("not json at all").is_none());
    }
}
