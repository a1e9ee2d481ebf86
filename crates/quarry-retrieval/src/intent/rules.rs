//! Per-intent classification rules.
//!
//! Each intent has a set of weighted phrase and pattern rules. Phrases
//! are plain lowercase substrings; patterns are word-bounded regexes for
//! terms that would over-match as substrings ("down" in "download").

use quarry_core::Intent;
use regex::Regex;

/// How a rule matches the normalized query.
pub enum Matcher {
    /// Lowercase substring match.
    Phrase(&'static str),
    Pattern(Regex),
}

/// One weighted classification rule.
pub struct Rule {
    pub intent: Intent,
    pub weight: f64,
    pub matcher: Matcher,
    /// Signal label recorded in `IntentResult::reasons`.
    pub reason: &'static str,
}

impl Rule {
    fn phrase(intent: Intent, weight: f64, phrase: &'static str) -> Self {
        Self {
            intent,
            weight,
            matcher: Matcher::Phrase(phrase),
            reason: phrase,
        }
    }

    fn pattern(intent: Intent, weight: f64, pattern: &'static str, reason: &'static str) -> Self {
        Self {
            intent,
            weight,
            matcher: Matcher::Pattern(
                Regex::new(pattern).expect("hardcoded rule pattern compiles"),
            ),
            reason,
        }
    }

    /// Whether this rule fires on a normalized (lowercased) query.
    pub fn matches(&self, query: &str) -> bool {
        match &self.matcher {
            Matcher::Phrase(phrase) => query.contains(phrase),
            Matcher::Pattern(pattern) => pattern.is_match(query),
        }
    }
}

/// The hardcoded rule table. `General` has no rules; it is the default
/// when nothing fires.
pub fn default_rules() -> Vec<Rule> {
    use Intent::*;

    vec![
        // Command: exact CLI lookups lean lexical.
        Rule::pattern(Command, 2.0, r"^(show|display|run|execute)\b", "imperative command verb"),
        Rule::pattern(Command, 1.5, r"\b(show|display)\b", "command verb"),
        Rule::phrase(Command, 2.0, "command"),
        Rule::phrase(Command, 1.5, "syntax"),
        Rule::phrase(Command, 1.0, "cli"),
        // Troubleshoot: symptom vocabulary, favors recall.
        Rule::phrase(Troubleshoot, 3.0, "troubleshoot"),
        Rule::phrase(Troubleshoot, 2.5, "not working"),
        Rule::phrase(Troubleshoot, 2.0, "error"),
        Rule::phrase(Troubleshoot, 2.0, "debug"),
        Rule::phrase(Troubleshoot, 2.0, "problem"),
        Rule::phrase(Troubleshoot, 2.0, "crash"),
        Rule::phrase(Troubleshoot, 1.5, "fail"),
        Rule::phrase(Troubleshoot, 1.5, "issue"),
        Rule::phrase(Troubleshoot, 1.5, "cannot"),
        Rule::phrase(Troubleshoot, 1.5, "can't"),
        Rule::phrase(Troubleshoot, 1.5, "won't"),
        Rule::pattern(Troubleshoot, 2.0, r"\bflap(ping|s)?\b", "flapping symptom"),
        Rule::pattern(Troubleshoot, 1.5, r"\bdrops?\b", "drop symptom"),
        Rule::pattern(Troubleshoot, 1.0, r"\bdown\b", "down symptom"),
        // Configuration.
        Rule::phrase(Configuration, 2.5, "configure"),
        Rule::phrase(Configuration, 2.0, "configuration"),
        Rule::phrase(Configuration, 1.5, "config"),
        Rule::phrase(Configuration, 2.0, "set up"),
        Rule::phrase(Configuration, 1.5, "setup"),
        Rule::phrase(Configuration, 1.5, "enable"),
        Rule::phrase(Configuration, 1.5, "disable"),
        Rule::pattern(
            Configuration,
            2.5,
            r"\bhow\s+(do|to|can|should)\b.*\b(configure|set\s?up|enable)\b",
            "how-to-configure phrasing",
        ),
        // Explanation: concept questions lean semantic.
        Rule::phrase(Explanation, 3.0, "explain"),
        Rule::phrase(Explanation, 2.5, "what is"),
        Rule::phrase(Explanation, 2.0, "what are"),
        Rule::phrase(Explanation, 2.5, "how does"),
        Rule::phrase(Explanation, 2.0, "why does"),
        Rule::phrase(Explanation, 2.0, "meaning"),
        Rule::phrase(Explanation, 2.0, "definition"),
        Rule::phrase(Explanation, 1.5, "understand"),
        Rule::phrase(Explanation, 1.5, "concept"),
        // Comparison.
        Rule::phrase(Comparison, 3.0, "difference between"),
        Rule::phrase(Comparison, 2.5, "compare"),
        Rule::phrase(Comparison, 2.0, "comparison"),
        Rule::phrase(Comparison, 2.5, "versus"),
        Rule::pattern(Comparison, 2.5, r"\bvs\.?\b", "vs shorthand"),
        Rule::phrase(Comparison, 2.0, "better than"),
        Rule::phrase(Comparison, 2.5, "pros and cons"),
        // Performance.
        Rule::phrase(Performance, 2.5, "performance"),
        Rule::phrase(Performance, 2.5, "latency"),
        Rule::phrase(Performance, 2.5, "throughput"),
        Rule::phrase(Performance, 2.5, "bottleneck"),
        Rule::phrase(Performance, 2.0, "slow"),
        Rule::phrase(Performance, 2.0, "optimize"),
        Rule::phrase(Performance, 2.0, "optimization"),
        Rule::phrase(Performance, 2.5, "high cpu"),
        Rule::phrase(Performance, 2.0, "memory usage"),
        Rule::phrase(Performance, 2.0, "utilization"),
        // Best practice.
        Rule::phrase(BestPractice, 3.0, "best practice"),
        Rule::phrase(BestPractice, 2.5, "recommended"),
        Rule::phrase(BestPractice, 2.0, "recommendation"),
        Rule::phrase(BestPractice, 2.0, "should i"),
        Rule::phrase(BestPractice, 2.0, "guideline"),
        Rule::phrase(BestPractice, 2.0, "proper way"),
        Rule::phrase(BestPractice, 2.0, "correct way"),
        // Verification.
        Rule::phrase(Verification, 2.5, "verify"),
        Rule::phrase(Verification, 2.0, "confirm"),
        Rule::phrase(Verification, 2.0, "validate"),
        Rule::phrase(Verification, 2.0, "make sure"),
        Rule::phrase(Verification, 2.5, "is it working"),
        Rule::phrase(Verification, 1.5, "check"),
        Rule::pattern(Verification, 1.0, r"\bstatus\b", "status query"),
        // Question: generic interrogative fallback, low weight so any
        // specific intent outscores it.
        Rule::pattern(Question, 1.0, r"\?\s*$", "trailing question mark"),
        Rule::pattern(Question, 1.0, r"^(what|which|when|where|who)\b", "interrogative opener"),
    ]
}
