//! The single active breathing configuration.
//!
//! `ActiveConfiguration` is an immutable value; every update produces a new value
//! through a pure transition. `ConfigStore` owns the current value behind one lock
//! so each transition is applied as a single unit and readers never observe a
//! half-applied update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::pattern::{
    BoxPattern, PatternVariant, ThreePhasePattern, TwoPhasePattern, VariantKind,
    validate_positive,
};

/// Cycle length used when neither a variant nor an override is set.
pub const DEFAULT_CYCLE_SECONDS: f64 = 16.0;

pub const DEFAULT_BOX_SCALE: f64 = 1.0;

/// Where the cycle length comes from. Holding one value of this type is what
/// makes "at most one pattern source" impossible to violate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternSource {
    Variant(PatternVariant),
    /// Legacy explicit cycle length with no phase breakdown.
    CycleOverride(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveConfiguration {
    pub box_scale: f64,
    pub source: Option<PatternSource>,
    /// Incremented on every successful update.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl Default for ActiveConfiguration {
    fn default() -> Self {
        Self {
            box_scale: DEFAULT_BOX_SCALE,
            source: Some(PatternSource::Variant(PatternVariant::Box(
                BoxPattern::default(),
            ))),
            revision: 0,
            updated_at: Utc::now(),
        }
    }
}

impl ActiveConfiguration {
    pub fn active_variant(&self) -> Option<&PatternVariant> {
        match &self.source {
            Some(PatternSource::Variant(variant)) => Some(variant),
            _ => None,
        }
    }

    pub fn cycle_seconds_override(&self) -> Option<f64> {
        match self.source {
            Some(PatternSource::CycleOverride(seconds)) => Some(seconds),
            _ => None,
        }
    }

    /// Active variant total, else the explicit override, else the default.
    pub fn effective_cycle_seconds(&self) -> f64 {
        match &self.source {
            Some(PatternSource::Variant(variant)) => variant.total_seconds(),
            Some(PatternSource::CycleOverride(seconds)) => *seconds,
            None => DEFAULT_CYCLE_SECONDS,
        }
    }

    fn next(&self) -> Self {
        Self {
            revision: self.revision + 1,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Replace the active variant, clearing any other variant or override.
    pub fn with_variant(&self, variant: PatternVariant) -> Result<Self, ValidationError> {
        variant.validate()?;
        Ok(Self {
            source: Some(PatternSource::Variant(variant)),
            ..self.next()
        })
    }

    /// Switch to an explicit cycle length, clearing the active variant.
    pub fn with_cycle_seconds(&self, seconds: f64) -> Result<Self, ValidationError> {
        let seconds = validate_positive("cycle_seconds", seconds)?;
        Ok(Self {
            source: Some(PatternSource::CycleOverride(seconds)),
            ..self.next()
        })
    }

    /// Change only the visual scale factor.
    pub fn with_box_scale(&self, box_scale: f64) -> Result<Self, ValidationError> {
        let box_scale = validate_positive("box_scale", box_scale)?;
        Ok(Self {
            box_scale,
            ..self.next()
        })
    }

    /// Apply a combined update. Every supplied field is validated before anything
    /// changes; a box `pattern` wins over `cycle_seconds`.
    pub fn with_update(&self, update: &ConfigUpdate) -> Result<Self, ValidationError> {
        if let Some(scale) = update.box_scale {
            validate_positive("box_scale", scale)?;
        }
        if let Some(pattern) = &update.pattern {
            pattern.validate()?;
        } else if let Some(seconds) = update.cycle_seconds {
            validate_positive("cycle_seconds", seconds)?;
        }

        let mut next = self.next();
        if let Some(scale) = update.box_scale {
            next.box_scale = scale;
        }
        if let Some(pattern) = update.pattern {
            next.source = Some(PatternSource::Variant(PatternVariant::Box(pattern)));
        } else if let Some(seconds) = update.cycle_seconds {
            next.source = Some(PatternSource::CycleOverride(seconds));
        }
        Ok(next)
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        let variant = self.active_variant();
        ConfigSnapshot {
            box_scale: self.box_scale,
            cycle_seconds: self.effective_cycle_seconds(),
            cycle_seconds_override: self.cycle_seconds_override(),
            variant: variant.map(PatternVariant::kind),
            pattern: match variant {
                Some(PatternVariant::Box(p)) => Some(*p),
                _ => None,
            },
            pattern_three: match variant {
                Some(PatternVariant::ThreePhase(p)) => Some(*p),
                _ => None,
            },
            pattern_two: match variant {
                Some(PatternVariant::TwoPhase(p)) => Some(*p),
                _ => None,
            },
            revision: self.revision,
            updated_at: self.updated_at,
        }
    }
}

/// Read-only view of the configuration as served to clients.
/// At most one of `pattern`, `pattern_three`, `pattern_two` is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConfigSnapshot {
    pub box_scale: f64,
    /// Effective cycle length in seconds
    pub cycle_seconds: f64,
    pub cycle_seconds_override: Option<f64>,
    pub variant: Option<VariantKind>,
    pub pattern: Option<BoxPattern>,
    pub pattern_three: Option<ThreePhasePattern>,
    pub pattern_two: Option<TwoPhasePattern>,
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

/// Combined update accepted by `POST /api/config`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ConfigUpdate {
    pub box_scale: Option<f64>,
    pub cycle_seconds: Option<f64>,
    pub pattern: Option<BoxPattern>,
}

/// Owner of the active configuration. One writer at a time; readers get copies.
#[derive(Debug, Default)]
pub struct ConfigStore {
    state: RwLock<ActiveConfiguration>,
}

impl ConfigStore {
    pub fn new(initial: ActiveConfiguration) -> Self {
        Self {
            state: RwLock::new(initial),
        }
    }

    pub async fn current(&self) -> ActiveConfiguration {
        self.state.read().await.clone()
    }

    pub async fn snapshot(&self) -> ConfigSnapshot {
        self.state.read().await.snapshot()
    }

    async fn transition<F>(&self, apply: F) -> Result<ConfigSnapshot, ValidationError>
    where
        F: FnOnce(&ActiveConfiguration) -> Result<ActiveConfiguration, ValidationError>,
    {
        let mut state = self.state.write().await;
        let next = apply(&state)?;
        *state = next;
        tracing::debug!(
            revision = state.revision,
            variant = ?state.active_variant().map(PatternVariant::kind),
            cycle_seconds = state.effective_cycle_seconds(),
            box_scale = state.box_scale,
            "Breathing configuration updated"
        );
        Ok(state.snapshot())
    }

    pub async fn set_box(&self, pattern: BoxPattern) -> Result<ConfigSnapshot, ValidationError> {
        self.transition(|state| state.with_variant(pattern.into()))
            .await
    }

    pub async fn set_three_phase(
        &self,
        pattern: ThreePhasePattern,
    ) -> Result<ConfigSnapshot, ValidationError> {
        self.transition(|state| state.with_variant(pattern.into()))
            .await
    }

    pub async fn set_two_phase(
        &self,
        pattern: TwoPhasePattern,
    ) -> Result<ConfigSnapshot, ValidationError> {
        self.transition(|state| state.with_variant(pattern.into()))
            .await
    }

    pub async fn set_cycle_seconds(&self, seconds: f64) -> Result<ConfigSnapshot, ValidationError> {
        self.transition(|state| state.with_cycle_seconds(seconds))
            .await
    }

    pub async fn set_box_scale(&self, box_scale: f64) -> Result<ConfigSnapshot, ValidationError> {
        self.transition(|state| state.with_box_scale(box_scale))
            .await
    }

    pub async fn apply_update(&self, update: &ConfigUpdate) -> Result<ConfigSnapshot, ValidationError> {
        self.transition(|state| state.with_update(update)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn bare() -> ActiveConfiguration {
        ActiveConfiguration {
            source: None,
            ..ActiveConfiguration::default()
        }
    }

    #[test]
    fn default_configuration_is_box_four_by_four() {
        let config = ActiveConfiguration::default();
        assert_eq!(config.box_scale, 1.0);
        assert_eq!(config.effective_cycle_seconds(), 16.0);
        assert_eq!(
            config.snapshot().variant,
            Some(VariantKind::Box),
        );
    }

    #[test]
    fn resolution_uses_variant_total_first() {
        let config = bare()
            .with_variant(ThreePhasePattern::new(4.0, 7.0, 8.0).unwrap().into())
            .unwrap();
        assert_eq!(config.effective_cycle_seconds(), 19.0);
    }

    #[test]
    fn resolution_falls_back_to_override() {
        let config = bare().with_cycle_seconds(10.0).unwrap();
        assert_eq!(config.effective_cycle_seconds(), 10.0);
        assert!(config.active_variant().is_none());
    }

    #[test]
    fn resolution_falls_back_to_default_without_any_source() {
        assert_eq!(bare().effective_cycle_seconds(), DEFAULT_CYCLE_SECONDS);
    }

    #[test]
    fn setting_a_variant_clears_the_override() {
        let config = bare()
            .with_cycle_seconds(10.0)
            .unwrap()
            .with_variant(TwoPhasePattern::new(3.0, 5.0).unwrap().into())
            .unwrap();
        let snapshot = config.snapshot();
        assert_eq!(snapshot.cycle_seconds, 8.0);
        assert_eq!(snapshot.cycle_seconds_override, None);
        assert_eq!(snapshot.variant, Some(VariantKind::Two));
        assert!(snapshot.pattern.is_none());
        assert!(snapshot.pattern_three.is_none());
    }

    #[test]
    fn setting_one_variant_clears_the_others() {
        let config = ActiveConfiguration::default()
            .with_variant(ThreePhasePattern::default().into())
            .unwrap();
        let snapshot = config.snapshot();
        assert!(snapshot.pattern.is_none());
        assert_eq!(snapshot.pattern_three, Some(ThreePhasePattern::default()));
        assert!(snapshot.pattern_two.is_none());
        assert_eq!(snapshot.cycle_seconds, 12.0);
    }

    #[test]
    fn box_scale_does_not_touch_the_pattern_source() {
        let before = ActiveConfiguration::default();
        let after = before.with_box_scale(2.5).unwrap();
        assert_eq!(after.box_scale, 2.5);
        assert_eq!(after.source, before.source);
    }

    #[test]
    fn combined_update_is_all_or_nothing() {
        let config = ActiveConfiguration::default();
        let update = ConfigUpdate {
            box_scale: Some(2.0),
            pattern: Some(BoxPattern {
                inhale: -1.0,
                ..BoxPattern::default()
            }),
            cycle_seconds: None,
        };
        assert!(config.with_update(&update).is_err());
    }

    #[test]
    fn combined_update_prefers_pattern_over_cycle_seconds() {
        let update = ConfigUpdate {
            box_scale: Some(0.5),
            cycle_seconds: Some(30.0),
            pattern: Some(BoxPattern::new(2.0, 2.0, 2.0, 2.0).unwrap()),
        };
        let next = bare().with_update(&update).unwrap();
        assert_eq!(next.box_scale, 0.5);
        assert_eq!(next.effective_cycle_seconds(), 8.0);
        assert_eq!(next.cycle_seconds_override(), None);
    }

    #[test]
    fn combined_update_with_cycle_seconds_clears_variant() {
        let update = ConfigUpdate {
            cycle_seconds: Some(20.0),
            ..ConfigUpdate::default()
        };
        let next = ActiveConfiguration::default().with_update(&update).unwrap();
        let snapshot = next.snapshot();
        assert_eq!(snapshot.variant, None);
        assert_eq!(snapshot.cycle_seconds, 20.0);
        assert_eq!(snapshot.cycle_seconds_override, Some(20.0));
    }

    #[tokio::test]
    async fn rejected_update_leaves_store_unchanged() {
        let store = ConfigStore::default();
        store.set_two_phase(TwoPhasePattern::new(3.0, 6.0).unwrap()).await.unwrap();
        let before = store.current().await;

        let err = store
            .set_box(BoxPattern {
                inhale: 0.0,
                hold1: 0.0,
                exhale: 0.0,
                hold2: 0.0,
            })
            .await
            .expect_err("zero total must be rejected");
        assert!(matches!(err, ValidationError::NonPositiveTotal { .. }));

        assert!(store.set_three_phase(ThreePhasePattern { inhale: -2.0, hold: 1.0, exhale: 1.0 }).await.is_err());
        assert!(store.set_cycle_seconds(0.0).await.is_err());
        assert!(store.set_box_scale(-1.0).await.is_err());

        assert_eq!(store.current().await, before);
    }

    #[tokio::test]
    async fn snapshot_reflects_last_successful_call() {
        let store = ConfigStore::default();
        store.set_box_scale(1.25).await.unwrap();
        store.set_cycle_seconds(12.0).await.unwrap();
        store.set_three_phase(ThreePhasePattern::new(1.0, 2.0, 3.0).unwrap()).await.unwrap();
        let _ = store.set_two_phase(TwoPhasePattern { inhale: -1.0, exhale: 2.0 }).await;

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.box_scale, 1.25);
        assert_eq!(snapshot.variant, Some(VariantKind::Three));
        assert_eq!(snapshot.cycle_seconds, 6.0);
        assert_eq!(snapshot.cycle_seconds_override, None);
        assert_eq!(snapshot.revision, 3);
    }

    #[tokio::test]
    async fn overflowing_pattern_never_becomes_active() {
        let store = ConfigStore::default();
        let before = store.current().await;

        let err = store
            .set_box(BoxPattern {
                inhale: 1e308,
                hold1: 1e308,
                exhale: 0.0,
                hold2: 0.0,
            })
            .await
            .expect_err("overflowing total must be rejected");
        assert!(matches!(err, ValidationError::NonFiniteTotal { .. }));

        let update = ConfigUpdate {
            box_scale: Some(2.0),
            pattern: Some(BoxPattern {
                inhale: f64::MAX,
                hold1: f64::MAX,
                exhale: 1.0,
                hold2: 1.0,
            }),
            ..ConfigUpdate::default()
        };
        assert!(store.apply_update(&update).await.is_err());
        assert_eq!(store.current().await, before);

        let json = serde_json::to_string(&store.snapshot().await).unwrap();
        let decoded: ConfigSnapshot = serde_json::from_str(&json).expect("snapshot reads back");
        assert_eq!(decoded.cycle_seconds, 16.0);
    }

    #[tokio::test]
    async fn concurrent_writers_never_tear_fields() {
        let store = Arc::new(ConfigStore::default());
        let mut handles = Vec::new();
        for i in 1..=16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let base = i as f64;
                store
                    .set_box(BoxPattern::new(base, 2.0 * base, 3.0 * base, 4.0 * base).unwrap())
                    .await
                    .unwrap();
                let snapshot = store.snapshot().await;
                let pattern = snapshot.pattern.expect("only box patterns are written");
                // Every field of one write shares a base; a torn read mixes bases.
                assert_eq!(pattern.hold1, 2.0 * pattern.inhale);
                assert_eq!(pattern.exhale, 3.0 * pattern.inhale);
                assert_eq!(pattern.hold2, 4.0 * pattern.inhale);
                assert_eq!(snapshot.cycle_seconds, 10.0 * pattern.inhale);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.current().await.revision, 16);
    }
}
