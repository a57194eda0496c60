use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Checks every phase is a finite value >= 0 and that the phases sum to > 0.
fn validate_phases(phases: &[(&'static str, f64)]) -> Result<f64, ValidationError> {
    for &(field, value) in phases {
        // `!(v >= 0)` also rejects NaN.
        if !(value >= 0.0) || !value.is_finite() {
            return Err(ValidationError::NegativePhase { field, value });
        }
    }
    let total: f64 = phases.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        return Err(ValidationError::NonPositiveTotal { total });
    }
    // Finite phases can still overflow when summed.
    if !total.is_finite() {
        return Err(ValidationError::NonFiniteTotal { total });
    }
    Ok(total)
}

/// Validates a strictly positive scalar such as `box_scale` or `cycle_seconds`.
pub fn validate_positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Four-phase "box" pattern: inhale, hold, exhale, hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoxPattern {
    #[serde(default = "default_phase")]
    pub inhale: f64,
    #[serde(default = "default_phase")]
    pub hold1: f64,
    #[serde(default = "default_phase")]
    pub exhale: f64,
    #[serde(default = "default_phase")]
    pub hold2: f64,
}

/// Inhale, hold, exhale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThreePhasePattern {
    #[serde(default = "default_phase")]
    pub inhale: f64,
    #[serde(default = "default_phase")]
    pub hold: f64,
    #[serde(default = "default_phase")]
    pub exhale: f64,
}

/// Inhale, exhale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TwoPhasePattern {
    #[serde(default = "default_phase")]
    pub inhale: f64,
    #[serde(default = "default_phase")]
    pub exhale: f64,
}

fn default_phase() -> f64 {
    4.0
}

impl Default for BoxPattern {
    fn default() -> Self {
        Self {
            inhale: 4.0,
            hold1: 4.0,
            exhale: 4.0,
            hold2: 4.0,
        }
    }
}

impl Default for ThreePhasePattern {
    fn default() -> Self {
        Self {
            inhale: 4.0,
            hold: 4.0,
            exhale: 4.0,
        }
    }
}

impl Default for TwoPhasePattern {
    fn default() -> Self {
        Self {
            inhale: 4.0,
            exhale: 4.0,
        }
    }
}

impl BoxPattern {
    pub fn new(inhale: f64, hold1: f64, exhale: f64, hold2: f64) -> Result<Self, ValidationError> {
        let pattern = Self {
            inhale,
            hold1,
            exhale,
            hold2,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    fn phases(&self) -> [(&'static str, f64); 4] {
        [
            ("inhale", self.inhale),
            ("hold1", self.hold1),
            ("exhale", self.exhale),
            ("hold2", self.hold2),
        ]
    }

    pub fn total_seconds(&self) -> f64 {
        self.phases().iter().map(|(_, value)| value).sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_phases(&self.phases()).map(|_| ())
    }
}

impl ThreePhasePattern {
    pub fn new(inhale: f64, hold: f64, exhale: f64) -> Result<Self, ValidationError> {
        let pattern = Self {
            inhale,
            hold,
            exhale,
        };
        pattern.validate()?;
        Ok(pattern)
    }

    fn phases(&self) -> [(&'static str, f64); 3] {
        [
            ("inhale", self.inhale),
            ("hold", self.hold),
            ("exhale", self.exhale),
        ]
    }

    pub fn total_seconds(&self) -> f64 {
        self.phases().iter().map(|(_, value)| value).sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_phases(&self.phases()).map(|_| ())
    }
}

impl TwoPhasePattern {
    pub fn new(inhale: f64, exhale: f64) -> Result<Self, ValidationError> {
        let pattern = Self { inhale, exhale };
        pattern.validate()?;
        Ok(pattern)
    }

    fn phases(&self) -> [(&'static str, f64); 2] {
        [("inhale", self.inhale), ("exhale", self.exhale)]
    }

    pub fn total_seconds(&self) -> f64 {
        self.phases().iter().map(|(_, value)| value).sum()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_phases(&self.phases()).map(|_| ())
    }
}

/// Which pattern shape is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    Box,
    Three,
    Two,
}

/// Exactly one breathing-timing shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternVariant {
    Box(BoxPattern),
    ThreePhase(ThreePhasePattern),
    TwoPhase(TwoPhasePattern),
}

impl PatternVariant {
    pub fn kind(&self) -> VariantKind {
        match self {
            PatternVariant::Box(_) => VariantKind::Box,
            PatternVariant::ThreePhase(_) => VariantKind::Three,
            PatternVariant::TwoPhase(_) => VariantKind::Two,
        }
    }

    pub fn total_seconds(&self) -> f64 {
        match self {
            PatternVariant::Box(p) => p.total_seconds(),
            PatternVariant::ThreePhase(p) => p.total_seconds(),
            PatternVariant::TwoPhase(p) => p.total_seconds(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            PatternVariant::Box(p) => p.validate(),
            PatternVariant::ThreePhase(p) => p.validate(),
            PatternVariant::TwoPhase(p) => p.validate(),
        }
    }
}

impl From<BoxPattern> for PatternVariant {
    fn from(pattern: BoxPattern) -> Self {
        PatternVariant::Box(pattern)
    }
}

impl From<ThreePhasePattern> for PatternVariant {
    fn from(pattern: ThreePhasePattern) -> Self {
        PatternVariant::ThreePhase(pattern)
    }
}

impl From<TwoPhasePattern> for PatternVariant {
    fn from(pattern: TwoPhasePattern) -> Self {
        PatternVariant::TwoPhase(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_every_phase() {
        assert_eq!(BoxPattern::default().total_seconds(), 16.0);
        assert_eq!(ThreePhasePattern::new(4.0, 7.0, 8.0).unwrap().total_seconds(), 19.0);
        assert_eq!(TwoPhasePattern::new(1.5, 1.5).unwrap().total_seconds(), 3.0);
    }

    #[test]
    fn zero_phases_are_allowed_when_total_is_positive() {
        let triangle = BoxPattern::new(0.0, 3.0, 0.0, 3.0).expect("0-3-0-3 is valid");
        assert_eq!(triangle.total_seconds(), 6.0);
    }

    #[test]
    fn negative_phase_is_rejected_with_field_name() {
        let err = ThreePhasePattern::new(4.0, -1.0, 4.0).expect_err("negative hold must fail");
        assert_eq!(
            err,
            ValidationError::NegativePhase {
                field: "hold",
                value: -1.0
            }
        );
    }

    #[test]
    fn all_zero_pattern_is_rejected() {
        let err = TwoPhasePattern::new(0.0, 0.0).expect_err("zero total must fail");
        assert_eq!(err, ValidationError::NonPositiveTotal { total: 0.0 });
    }

    #[test]
    fn nan_phase_is_rejected() {
        assert!(BoxPattern::new(f64::NAN, 4.0, 4.0, 4.0).is_err());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let err = BoxPattern::new(1e308, 1e308, 0.0, 0.0).expect_err("sum overflows to inf");
        assert!(matches!(err, ValidationError::NonFiniteTotal { .. }));
        assert_eq!(err.field(), "pattern");
        assert!(ThreePhasePattern::new(f64::MAX, f64::MAX, 1.0).is_err());
        assert!(TwoPhasePattern::new(f64::MAX, f64::MAX).is_err());
    }

    #[test]
    fn missing_fields_deserialize_to_four_seconds() {
        let pattern: BoxPattern =
            serde_json::from_str(r#"{"inhale": 5}"#).expect("partial body should parse");
        assert_eq!(pattern.inhale, 5.0);
        assert_eq!(pattern.hold2, 4.0);
    }

    #[test]
    fn variant_kind_tracks_shape() {
        let variant = PatternVariant::from(TwoPhasePattern::default());
        assert_eq!(variant.kind(), VariantKind::Two);
        assert_eq!(variant.total_seconds(), 8.0);
    }

    #[test]
    fn validate_positive_rejects_zero_and_infinity() {
        assert!(validate_positive("box_scale", 0.0).is_err());
        assert!(validate_positive("box_scale", f64::INFINITY).is_err());
        assert_eq!(validate_positive("box_scale", 1.5), Ok(1.5));
    }
}
