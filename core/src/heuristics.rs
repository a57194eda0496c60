//! Deterministic local recommendation rules used when no remote capability is
//! configured. Pure functions over text; no I/O.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{BreathingTechnique, Catalog, Emotion};
use crate::chat::{ChatMessage, user_texts};

/// Phrases in the latest user turn that mean "give me a plan now".
pub const READY_TRIGGERS: [&str; 6] = ["recommend", "suggest", "ready", "start", "go ahead", "plan"];

/// User turns after which a plan is offered regardless of wording.
pub const READY_AFTER_USER_TURNS: usize = 2;

/// Technique offered by the companion chat once the user is ready.
// Older clients labelled this plan "Calm / Relaxed"; the catalog files Box
// breathing under "Anxious / Stressed" and the plan embeds that row unchanged.
pub const READY_DEFAULT_PATTERN: &str = "Box breathing";

/// Secondary stems, consulted only when no label keyword matches. Each must
/// start a word ("stressed" counts, "distress" does not).
const CUE_STEMS: [(Emotion, &str); 2] = [
    (Emotion::AnxiousStressed, "stress"),
    (Emotion::SleepyDrowsy, "sleep"),
];

static CUE_RES: LazyLock<Vec<(Emotion, Regex)>> = LazyLock::new(|| {
    CUE_STEMS
        .iter()
        .map(|&(emotion, stem)| {
            let re = Regex::new(&format!(r"\b{}", regex::escape(stem))).expect("valid cue regex");
            (emotion, re)
        })
        .collect()
});

/// Whether the companion chat should hand out a plan for this conversation.
pub fn is_ready(turns: &[ChatMessage]) -> bool {
    let users = user_texts(turns);
    let latest = users.last().map(String::as_str).unwrap_or_default();
    READY_TRIGGERS.iter().any(|trigger| latest.contains(trigger))
        || users.len() >= READY_AFTER_USER_TURNS
}

fn has_cue(emotion: Emotion, text: &str) -> bool {
    CUE_RES
        .iter()
        .any(|(candidate, re)| *candidate == emotion && re.is_match(text))
}

/// Pick the catalog entry whose label keyword first appears in `text`.
///
/// Table order decides ties. When no label keyword matches, a second pass in
/// table order checks the cue stems; with no hit at all the first entry wins.
pub fn match_technique<'a>(text: &str, catalog: &'a Catalog) -> &'a BreathingTechnique {
    let text = text.to_lowercase();

    if let Some(entry) = catalog
        .all()
        .iter()
        .find(|entry| text.contains(&entry.emotion.keyword()))
    {
        return entry;
    }

    catalog
        .all()
        .iter()
        .find(|entry| has_cue(entry.emotion, &text))
        .unwrap_or_else(|| catalog.first())
}

/// Closing sentence every conversation recommendation ends with.
pub fn trailer_sentence(technique: &BreathingTechnique) -> String {
    format!(
        "It seems like you had a very {} kind of day, let's do a quick {} to help you.",
        technique.emotion.label(),
        technique.pattern_name
    )
}

pub const CONVERSATION_PREAMBLE: [&str; 2] = [
    "I\u{2019}m here with you. Let\u{2019}s take a gentle breath together.",
    "Would you like to try box breathing or a slower exhale today?",
];

pub const NOT_READY_REPLY: &str =
    "I'm here with you. That sounds like a lot. What would you like to feel right now?";

pub const READY_REPLY_OPENING: &str = "We can ground together with box breathing.";

pub const READY_REPLY_CLOSING: &str = "I'll set that up now.";
