use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CatalogError;

/// Emotional states the recommendation engine can infer.
///
/// Serialized as the human-readable catalog label (e.g. `"Anxious / Stressed"`),
/// which is also the closed label set handed to the remote collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Emotion {
    #[serde(rename = "Anxious / Stressed")]
    AnxiousStressed,
    #[serde(rename = "Calm / Relaxed")]
    CalmRelaxed,
    #[serde(rename = "Low energy / Fatigue")]
    LowEnergyFatigue,
    #[serde(rename = "Focus / Attention")]
    FocusAttention,
    #[serde(rename = "Angry / Frustrated")]
    AngryFrustrated,
    #[serde(rename = "Fear / Panic")]
    FearPanic,
    #[serde(rename = "Sad / Depressed")]
    SadDepressed,
    #[serde(rename = "Energized / Excited")]
    EnergizedExcited,
    #[serde(rename = "Sleepy / Drowsy")]
    SleepyDrowsy,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::AnxiousStressed,
        Emotion::CalmRelaxed,
        Emotion::LowEnergyFatigue,
        Emotion::FocusAttention,
        Emotion::AngryFrustrated,
        Emotion::FearPanic,
        Emotion::SadDepressed,
        Emotion::EnergizedExcited,
        Emotion::SleepyDrowsy,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Emotion::AnxiousStressed => "Anxious / Stressed",
            Emotion::CalmRelaxed => "Calm / Relaxed",
            Emotion::LowEnergyFatigue => "Low energy / Fatigue",
            Emotion::FocusAttention => "Focus / Attention",
            Emotion::AngryFrustrated => "Angry / Frustrated",
            Emotion::FearPanic => "Fear / Panic",
            Emotion::SadDepressed => "Sad / Depressed",
            Emotion::EnergizedExcited => "Energized / Excited",
            Emotion::SleepyDrowsy => "Sleepy / Drowsy",
        }
    }

    /// Lower-cased text before the "/" of the label ("low energy", "sleepy", ...).
    pub fn keyword(self) -> String {
        self.label()
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Emotion {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.label() == wanted)
            .ok_or_else(|| CatalogError::NotFound(s.to_string()))
    }
}

/// Phase durations of a catalog technique, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PhaseTiming {
    pub inhale: f64,
    pub hold: f64,
    pub exhale: f64,
    pub hold_after_exhale: f64,
}

impl PhaseTiming {
    pub fn total_seconds(&self) -> f64 {
        self.inhale + self.hold + self.exhale + self.hold_after_exhale
    }
}

/// One emotion → breathing technique mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BreathingTechnique {
    pub emotion: Emotion,
    /// Descriptive technique name (e.g. "Box breathing")
    #[serde(rename = "pattern")]
    pub pattern_name: String,
    pub timing: PhaseTiming,
    pub effect: String,
}

/// The fixed, ordered emotion → technique table.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<BreathingTechnique>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::builtin);

/// Process-wide catalog, built on first access and never mutated.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

fn technique(
    emotion: Emotion,
    pattern_name: &str,
    [inhale, hold, exhale, hold_after_exhale]: [f64; 4],
    effect: &str,
) -> BreathingTechnique {
    BreathingTechnique {
        emotion,
        pattern_name: pattern_name.to_string(),
        timing: PhaseTiming {
            inhale,
            hold,
            exhale,
            hold_after_exhale,
        },
        effect: effect.to_string(),
    }
}

impl Catalog {
    fn builtin() -> Self {
        use Emotion::*;

        Self {
            entries: vec![
                technique(
                    AnxiousStressed,
                    "Box breathing",
                    [4.0, 4.0, 4.0, 4.0],
                    "Calms nervous system, reduces anxiety",
                ),
                technique(
                    CalmRelaxed,
                    "Extended exhale breathing",
                    [4.0, 0.0, 6.0, 0.0],
                    "Promotes parasympathetic activation and relaxation",
                ),
                technique(
                    LowEnergyFatigue,
                    "Short, active breathing",
                    [2.0, 0.0, 2.0, 0.0],
                    "Increases alertness and activity, counters sluggishness",
                ),
                technique(
                    FocusAttention,
                    "Cyclic sighing",
                    [3.0, 1.0, 6.0, 0.0],
                    "Enhances attention and mood, reduces respiratory rate",
                ),
                technique(
                    AngryFrustrated,
                    "Slow inhale-hold-exhale",
                    [4.0, 7.0, 8.0, 0.0],
                    "Reduces anger, controls emotional reactions",
                ),
                technique(
                    FearPanic,
                    "Slow, deep breathing with equal inhale-exhale",
                    [4.0, 0.0, 4.0, 0.0],
                    "Reduces hyperventilation and panic symptoms",
                ),
                technique(
                    SadDepressed,
                    "Gentle slow diaphragmatic breathing",
                    [5.0, 0.0, 5.0, 0.0],
                    "Improves mood and emotional stability",
                ),
                technique(
                    EnergizedExcited,
                    "Fast paced inhale-exhale",
                    [1.5, 0.0, 1.5, 0.0],
                    "Boosts sympathetic activation for energy",
                ),
                technique(
                    SleepyDrowsy,
                    "Slow steady breathing",
                    [4.0, 0.0, 6.0, 0.0],
                    "Promotes relaxation and sleep readiness",
                ),
            ],
        }
    }

    /// All entries in table order.
    pub fn all(&self) -> &[BreathingTechnique] {
        &self.entries
    }

    /// First entry of the table; the keyword heuristic's fallback.
    pub fn first(&self) -> &BreathingTechnique {
        // Built from a literal with one entry per `Emotion`.
        &self.entries[0]
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.emotion.label()).collect()
    }

    pub fn get(&self, emotion: Emotion) -> &BreathingTechnique {
        self.entries
            .iter()
            .find(|entry| entry.emotion == emotion)
            .unwrap_or_else(|| self.first())
    }

    /// Look up an entry by its emotion label.
    pub fn lookup(&self, label: &str) -> Result<&BreathingTechnique, CatalogError> {
        let emotion: Emotion = label.parse()?;
        Ok(self.get(emotion))
    }

    pub fn find_by_pattern(&self, pattern_name: &str) -> Option<&BreathingTechnique> {
        self.entries
            .iter()
            .find(|entry| entry.pattern_name.eq_ignore_ascii_case(pattern_name))
    }

    /// True when `candidate` equals the table entry for its emotion field by field.
    pub fn contains_verbatim(&self, candidate: &BreathingTechnique) -> bool {
        self.get(candidate.emotion) == candidate
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Emotion, catalog};
    use crate::error::CatalogError;

    #[test]
    fn catalog_has_exactly_one_entry_per_emotion() {
        let entries = catalog().all();
        assert_eq!(entries.len(), Emotion::ALL.len());

        let unique: HashSet<Emotion> = entries.iter().map(|entry| entry.emotion).collect();
        assert_eq!(unique.len(), Emotion::ALL.len());
    }

    #[test]
    fn lookup_succeeds_for_every_listed_label() {
        for entry in catalog().all() {
            let found = catalog()
                .lookup(entry.emotion.label())
                .expect("labels from all() must resolve");
            assert_eq!(found.emotion, entry.emotion);
            assert_eq!(found, entry);
        }
    }

    #[test]
    fn lookup_rejects_unknown_label() {
        let err = catalog()
            .lookup("Bored / Restless")
            .expect_err("unknown label must fail");
        assert_eq!(err, CatalogError::NotFound("Bored / Restless".to_string()));
    }

    #[test]
    fn table_order_starts_with_anxious_and_ends_with_sleepy() {
        let entries = catalog().all();
        assert_eq!(entries[0].emotion, Emotion::AnxiousStressed);
        assert_eq!(entries[0].pattern_name, "Box breathing");
        assert_eq!(entries[8].emotion, Emotion::SleepyDrowsy);
    }

    #[test]
    fn keyword_is_lowercased_text_before_slash() {
        assert_eq!(Emotion::LowEnergyFatigue.keyword(), "low energy");
        assert_eq!(Emotion::SleepyDrowsy.keyword(), "sleepy");
        assert_eq!(Emotion::AnxiousStressed.keyword(), "anxious");
    }

    #[test]
    fn techniques_serialize_with_catalog_wire_names() {
        let value = serde_json::to_value(catalog().get(Emotion::FocusAttention))
            .expect("technique should serialize");
        assert_eq!(value["emotion"], "Focus / Attention");
        assert_eq!(value["pattern"], "Cyclic sighing");
        assert_eq!(value["timing"]["hold_after_exhale"], 0.0);
    }

    #[test]
    fn find_by_pattern_ignores_case() {
        let entry = catalog()
            .find_by_pattern("box breathing")
            .expect("box breathing is in the table");
        assert_eq!(entry.emotion, Emotion::AnxiousStressed);
        assert!(catalog().find_by_pattern("4-7-8").is_none());
    }
}
