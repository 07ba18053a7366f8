//! Declarative column-role rules.
//!
//! One ordered keyword table decides how a column is treated everywhere:
//! the projector uses it to drop and consolidate columns, the composer
//! uses it to pick formatting. Keeping a single table means the two can
//! never disagree about what counts as money.

/// Role assigned to a column by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Always removed from the projection (discount noise).
    Excluded,
    Date,
    Monetary,
    /// Document identifiers (national ID, tax ID, terminal ID) that get
    /// consolidated into the synthetic document column.
    Document,
    /// Codes, references and names: rendered as plain text even when the
    /// value happens to be numeric.
    Identity,
    Other,
}

/// Name of the synthetic consolidated document column.
pub const DOCUMENT_COLUMN: &str = "Documento";

struct RoleRule {
    role: ColumnRole,
    /// Rule fires when any of these appears in the normalized name...
    any: &'static [&'static str],
    /// ...and none of these does.
    none: &'static [&'static str],
}

/// Ordered: the first firing rule wins, so date/amount keywords shadow the
/// document-identifier keywords as required for consolidation.
const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: ColumnRole::Excluded,
        any: &["descuento", "dcto", "discount"],
        none: &[],
    },
    RoleRule {
        role: ColumnRole::Date,
        any: &["fecha", "date", "dia"],
        none: &[],
    },
    RoleRule {
        role: ColumnRole::Monetary,
        any: &["valor", "vlr", "monto", "importe", "total", "abono", "saldo", "neto"],
        none: &[],
    },
    RoleRule {
        role: ColumnRole::Document,
        any: &["cedula", "nit", "identificacion", "documento", "terminal"],
        none: &["operacion", "movimiento", "transaccion"],
    },
    RoleRule {
        role: ColumnRole::Identity,
        any: &[
            "codigo", "tienda", "nombre", "referencia", "factura", "nota",
            "transaccion", "operacion", "cuenta", "terminal",
        ],
        none: &[],
    },
];

/// Invoice and credit-note references are financially critical and survive
/// any template elimination rule, alongside date and monetary columns.
const PROTECTED_KEYWORDS: &[&str] = &["factura", "nota"];

/// Classify a column name. The name is accent-stripped and lower-cased
/// before keyword search, so `Valor Crédito` and `VALOR CREDITO` agree.
pub fn classify(name: &str) -> ColumnRole {
    let n = normalize_name(name);
    for rule in ROLE_RULES {
        if rule.any.iter().any(|k| n.contains(k)) && !rule.none.iter().any(|k| n.contains(k)) {
            return rule.role;
        }
    }
    ColumnRole::Other
}

/// Whether a column must survive template `dropped_columns` configuration.
pub fn is_protected(name: &str) -> bool {
    if matches!(classify(name), ColumnRole::Date | ColumnRole::Monetary) {
        return true;
    }
    let n = normalize_name(name);
    PROTECTED_KEYWORDS.iter().any(|k| n.contains(k))
}

/// Lower-case and fold Spanish accents for keyword comparison.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().chars().map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}
