/// Ordered keyword groups mapping raw filenames and template ids to the
/// canonical provider label. The first group with any hit wins, so a more
/// specific provider must sit above a generic one.
const SOURCE_GROUPS: &[(&[&str], &str)] = &[
    (&["addi"], "ADDI"),
    (&["sistecredito", "sistecred"], "SISTECREDITO"),
    (&["redeban", "rbm"], "REDEBAN"),
    (&["credibanco"], "CREDIBANCO"),
    (&["bold"], "BOLD"),
    (&["consignacion", "extracto"], "TRANSFERENCIAS"),
    (&["bono", "gift"], "BONOS"),
];

/// Canonical label for bank-transfer statements, applied as a substring
/// override on the fallback label.
const TRANSFERS_LABEL: &str = "TRANSFERENCIAS";

/// Derive the human-facing source label for one file.
///
/// Falls back to the upper-cased template id, or the raw filename when the
/// template was never recognized.
pub fn source_label(file_name: &str, template_id: Option<&str>) -> String {
    let name = file_name.to_lowercase();
    let id = template_id.unwrap_or_default().to_lowercase();

    for (keywords, label) in SOURCE_GROUPS {
        if keywords.iter().any(|k| name.contains(k) || id.contains(k)) {
            return (*label).to_string();
        }
    }

    let fallback = match template_id {
        Some(id) => id.trim().to_uppercase(),
        None => file_name.trim().to_string(),
    };
    if fallback.to_lowercase().contains("transferencia") {
        return TRANSFERS_LABEL.to_string();
    }
    fallback
}
