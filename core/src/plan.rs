//! `PLAN_JSON:` marker lines: a machine-parseable technique embedded in a
//! human-readable reply.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{BreathingTechnique, Catalog};

pub const PLAN_MARKER: &str = "PLAN_JSON:";

static PLAN_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*PLAN_JSON:\s*(\{.*\})\s*$").expect("valid plan marker regex")
});

/// Render the marker line for `technique` as compact JSON.
pub fn render_plan_line(technique: &BreathingTechnique) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(technique)?;
    Ok(format!("{PLAN_MARKER} {json}"))
}

/// Parse the first marker line in `reply`, if any.
pub fn extract_plan(reply: &str) -> Option<BreathingTechnique> {
    let captures = PLAN_LINE_RE.captures(reply)?;
    let payload = captures.get(1)?.as_str();
    match serde_json::from_str(payload) {
        Ok(technique) => Some(technique),
        Err(err) => {
            tracing::warn!(error = %err, "PLAN_JSON marker present but payload did not parse");
            None
        }
    }
}

/// Like [`extract_plan`], but only returns techniques identical to a catalog entry.
pub fn extract_catalog_plan(reply: &str, catalog: &Catalog) -> Option<BreathingTechnique> {
    extract_plan(reply).filter(|technique| {
        let known = catalog.contains_verbatim(technique);
        if !known {
            tracing::warn!(
                emotion = %technique.emotion,
                pattern = %technique.pattern_name,
                "PLAN_JSON technique does not match the catalog entry"
            );
        }
        known
    })
}
