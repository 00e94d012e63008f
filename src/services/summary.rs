// src/services/summary.rs

//! One-line summaries of submission bodies.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Description, Link};

/// Placeholder sentence left in the body when the submitter skipped the
/// summary section of the pull request template.
pub const PLACEHOLDER: &str = "[Please write a quick summary of the package.]";

/// Heading title introducing the summary section.
const SUMMARY_HEADING: &str = "Brief summary";

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]\(([^()\s]+)\)").expect("valid regex"));

/// Summarize a submission body as a single line with its links split out.
///
/// Returns `None` when there is no body or no non-blank candidate line.
pub fn summarize(body: Option<&str>) -> Option<Description> {
    let body = body?.replace(PLACEHOLDER, "");
    let candidate = summary_section(&body).unwrap_or(body.as_str());

    let line = candidate
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?;

    Some(render_links(line))
}

/// Text between the "Brief summary" heading line and the next heading.
fn summary_section(body: &str) -> Option<&str> {
    let mut offset = 0;
    let mut start = None;

    for line in body.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let is_heading = line.trim_start().starts_with('#');
        match start {
            None if is_heading && heading_title(line).starts_with(SUMMARY_HEADING) => {
                start = Some(offset);
            }
            Some(s) if is_heading => return Some(&body[s..line_start]),
            _ => {}
        }
    }

    start.map(|s| &body[s..])
}

fn heading_title(line: &str) -> &str {
    line.trim_start().trim_start_matches('#').trim()
}

/// Split markdown inline links out of `text`, leaving the rest verbatim.
pub fn render_links(text: &str) -> Description {
    let mut desc = Description::default();
    let mut last = 0;

    for caps in LINK_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        desc.push_text(&text[last..whole.start()]);
        desc.push_link(Link::new(&caps[1], &caps[2]));
        last = whole.end();
    }
    desc.push_text(&text[last..]);

    desc
}
