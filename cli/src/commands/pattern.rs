use breathwork_core::error::ValidationError;
use breathwork_core::pattern::{PatternVariant, VariantKind};
use clap::ValueEnum;

use crate::util::{api_request, usage_error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PatternKind {
    Box,
    Three,
    Two,
}

impl From<PatternKind> for VariantKind {
    fn from(kind: PatternKind) -> Self {
        match kind {
            PatternKind::Box => VariantKind::Box,
            PatternKind::Three => VariantKind::Three,
            PatternKind::Two => VariantKind::Two,
        }
    }
}

pub fn path(kind: VariantKind) -> &'static str {
    match kind {
        VariantKind::Box => "/api/patterns/box",
        VariantKind::Three => "/api/patterns/three",
        VariantKind::Two => "/api/patterns/two",
    }
}

/// Request body for the variant's slot: the bare phase object.
pub fn body(variant: &PatternVariant) -> serde_json::Value {
    let value = match variant {
        PatternVariant::Box(pattern) => serde_json::to_value(pattern),
        PatternVariant::ThreePhase(pattern) => serde_json::to_value(pattern),
        PatternVariant::TwoPhase(pattern) => serde_json::to_value(pattern),
    };
    value.unwrap_or_default()
}

pub async fn get(api_url: &str, kind: PatternKind) -> i32 {
    api_request(api_url, reqwest::Method::GET, path(kind.into()), None, &[]).await
}

/// Activate `variant`. Durations are checked locally first so obvious mistakes
/// never reach the server.
pub async fn set(api_url: &str, variant: Result<PatternVariant, ValidationError>) -> i32 {
    let variant = match variant {
        Ok(variant) => variant,
        Err(err) => {
            return usage_error(
                &err.to_string(),
                Some("Phase durations are seconds, >= 0, with a positive total"),
            );
        }
    };
    api_request(
        api_url,
        reqwest::Method::POST,
        path(variant.kind()),
        Some(body(&variant)),
        &[],
    )
    .await
}

#[cfg(test)]
mod tests {
    use breathwork_core::pattern::{BoxPattern, ThreePhasePattern, TwoPhasePattern};
    use serde_json::json;

    use super::*;

    #[test]
    fn three_phase_body_uses_single_hold() {
        let variant = PatternVariant::from(ThreePhasePattern::new(4.0, 7.0, 8.0).unwrap());
        assert_eq!(path(variant.kind()), "/api/patterns/three");
        assert_eq!(body(&variant), json!({"inhale": 4.0, "hold": 7.0, "exhale": 8.0}));
    }

    #[test]
    fn box_body_carries_both_holds() {
        let variant = PatternVariant::from(BoxPattern::new(4.0, 2.0, 4.0, 0.0).unwrap());
        let body = body(&variant);
        assert_eq!(body["hold1"], 2.0);
        assert_eq!(body["hold2"], 0.0);
    }

    #[test]
    fn all_zero_pattern_is_rejected_before_sending() {
        assert!(TwoPhasePattern::new(0.0, 0.0).is_err());
    }

    #[test]
    fn cli_kind_maps_to_slot_path() {
        assert_eq!(path(PatternKind::Two.into()), "/api/patterns/two");
    }
}
