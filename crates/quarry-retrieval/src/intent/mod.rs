//! Intent classification engine.
//!
//! Scores the query against every intent's rule set independently; the
//! highest score wins, ties broken by the fixed priority order.
//! Confidence is the winning score normalized against the sum of all
//! intent scores. Recent conversation turns can boost a consistent
//! winner or let a short anaphoric follow-up inherit the prior turn's
//! intent at reduced confidence. Exactly one intent is always returned;
//! `General` is the default when no rule fires.

pub mod params;
pub mod rules;

use std::collections::HashMap;

use tracing::debug;

use quarry_core::config::defaults::{HISTORY_WINDOW, INHERITED_CONFIDENCE_FACTOR};
use quarry_core::models::ConversationTurn;
use quarry_core::{Intent, IntentResult, SearchParams};

use rules::Rule;

/// The classifier. Holds the compiled rule table and per-intent
/// parameter overrides.
pub struct IntentEngine {
    rules: Vec<Rule>,
    overrides: HashMap<Intent, SearchParams>,
}

impl IntentEngine {
    pub fn new() -> Self {
        Self {
            rules: rules::default_rules(),
            overrides: HashMap::new(),
        }
    }

    /// Replace parameter tuples for specific intents (from TOML config).
    pub fn with_param_overrides(mut self, overrides: HashMap<String, SearchParams>) -> Self {
        self.overrides = params::load_param_overrides(&overrides);
        self
    }

    /// Parameter tuple for an intent, override-aware.
    pub fn params_for(&self, intent: Intent) -> SearchParams {
        self.overrides
            .get(&intent)
            .copied()
            .unwrap_or_else(|| params::default_params(intent))
    }

    /// Classify a query given optional recent conversation turns
    /// (newest last; only the most recent window is inspected).
    pub fn classify(&self, query: &str, history: &[ConversationTurn]) -> IntentResult {
        let normalized = normalize(query);
        let (scores, mut reasons) = self.score_intents(&normalized);
        let total: f64 = scores.values().sum();

        if total == 0.0 {
            // A short follow-up referencing "it"/"that" inherits the
            // prior turn's intent with reduced confidence.
            if is_anaphoric_followup(&normalized) {
                if let Some(inherited) = self.inherit_from_history(history) {
                    return inherited;
                }
            }
            return IntentResult {
                intent: Intent::General,
                confidence: 0.0,
                reasons: Vec::new(),
                params: self.params_for(Intent::General),
            };
        }

        let (winner, winning_score) = top_intent(&scores).unwrap_or((Intent::General, 0.0));

        let mut confidence = winning_score / total;

        // A recent turn classifying to the same intent is corroborating
        // evidence.
        if self
            .recent_history_intent(history)
            .is_some_and(|prior| prior == winner)
        {
            confidence = (confidence * 1.1).min(1.0);
            reasons.push("consistent with recent conversation".to_string());
        }

        let reasons = reasons
            .into_iter()
            .filter(|r| r.starts_with(winner.as_str()) || !r.contains(": "))
            .map(|r| r.trim_start_matches(&format!("{winner}: ")).to_string())
            .collect();

        debug!(intent = %winner, confidence, "classified query intent");
        IntentResult {
            intent: winner,
            confidence,
            reasons,
            params: self.params_for(winner),
        }
    }

    /// Score every intent independently. Reasons are prefixed with the
    /// intent name so the winner's signals can be extracted afterwards.
    fn score_intents(&self, normalized: &str) -> (HashMap<Intent, f64>, Vec<String>) {
        let mut scores: HashMap<Intent, f64> = HashMap::new();
        let mut reasons = Vec::new();

        for rule in &self.rules {
            if rule.matches(normalized) {
                *scores.entry(rule.intent).or_default() += rule.weight;
                reasons.push(format!("{}: {}", rule.intent, rule.reason));
            }
        }
        (scores, reasons)
    }

    /// Most recent history turn with a decisive classification.
    fn recent_history_intent(&self, history: &[ConversationTurn]) -> Option<Intent> {
        history
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .find_map(|turn| {
                let (scores, _) = self.score_intents(&normalize(&turn.text));
                top_intent(&scores).map(|(intent, _)| intent)
            })
    }

    fn inherit_from_history(&self, history: &[ConversationTurn]) -> Option<IntentResult> {
        for turn in history.iter().rev().take(HISTORY_WINDOW) {
            let normalized = normalize(&turn.text);
            let (scores, _) = self.score_intents(&normalized);
            let total: f64 = scores.values().sum();
            if total == 0.0 {
                continue;
            }
            let (intent, score) = top_intent(&scores)?;
            return Some(IntentResult {
                confidence: (score / total) * INHERITED_CONFIDENCE_FACTOR,
                reasons: vec![format!("inherited from prior turn ({intent})")],
                params: self.params_for(intent),
                intent,
            });
        }
        None
    }
}

/// Highest-scoring intent; equal scores resolve by the fixed priority
/// order (lower priority value wins).
fn top_intent(scores: &HashMap<Intent, f64>) -> Option<(Intent, f64)> {
    scores
        .iter()
        .map(|(intent, score)| (*intent, *score))
        .max_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.0.priority().cmp(&a.0.priority()))
        })
}

impl Default for IntentEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Short turn leaning on a pronoun from the previous exchange.
fn is_anaphoric_followup(normalized: &str) -> bool {
    let word_count = normalized.split_whitespace().count();
    if word_count == 0 || word_count > 8 {
        return false;
    }
    normalized
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|w| matches!(w, "it" | "that" | "this" | "those" | "same"))
}
