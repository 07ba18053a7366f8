use cuadre_core::{Registry, Template};

/// Outcome of matching a filename against the template registry.
#[derive(Debug, Clone)]
pub struct TemplateMatch {
    pub template: Template,
    pub score: f64,
}

/// Minimum score for a filename to count as recognized. Below this for
/// every template, the file proceeds with no elimination rules and a
/// filename-derived source label.
pub const MATCH_THRESHOLD: f64 = 0.5;

/// Find the best-scoring template for a filename, or `None` when nothing
/// clears the threshold. On an exact score tie the earlier registry entry
/// wins.
pub fn match_template(file_name: &str, registry: &Registry) -> Option<TemplateMatch> {
    let mut best: Option<(&Template, f64)> = None;
    for template in &registry.templates {
        let s = score(&template.id, file_name);
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((template, s));
        }
    }
    best.filter(|(_, s)| *s >= MATCH_THRESHOLD)
        .map(|(template, score)| TemplateMatch {
            template: template.clone(),
            score,
        })
}

/// Score one template id against a filename.
///
/// Both sides are reduced to lower-case alphanumerics, which makes the
/// match immune to the prefixes, suffixes and timestamps providers bolt
/// onto their base filenames. Exact equality scores 1.0, a literal
/// substring hit 0.9; otherwise a forward-only subsequence walk over the
/// filename counts how much of the template id survives in order.
fn score(template_id: &str, file_name: &str) -> f64 {
    let id = normalize(template_id);
    let name = normalize(file_name);
    if id.is_empty() || name.is_empty() {
        return 0.0;
    }
    if id == name {
        return 1.0;
    }
    if name.contains(&id) {
        return 0.9;
    }
    if id.len() > name.len() {
        return 0.0;
    }

    let name_bytes = name.as_bytes();
    let mut cursor = 0usize;
    let mut hits = 0usize;
    for ch in id.bytes() {
        // Never backtrack: each hit consumes filename characters for good.
        if let Some(offset) = name_bytes[cursor..].iter().position(|&b| b == ch) {
            hits += 1;
            cursor += offset + 1;
        }
    }
    hits as f64 / name.len() as f64
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
