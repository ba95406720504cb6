//! Advisory checks applied where insight text enters a system.
//!
//! Template: `[WHAT] using [HOW], which [WHY/IMPACT]`, e.g. "Implements token
//! refresh using Redis cache with sliding window TTL, which reduces database
//! load and prevents session timeouts".

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Strictness;

/// `[WHAT]` verbs, matched as case-insensitive substrings.
pub const ACTION_VERBS: &[&str] = &[
    // core behaviour
    "implements", "provides", "manages", "handles", "defines", "executes", "processes",
    "utilizes", "supports", "operates", "maintains", "governs", "enforces", "generates",
    "establishes", "determines", "facilitates", "coordinates", "initiates", "terminates",
    "renders", "abstracts", "encapsulates", "delegates", "wraps", "extends", "overrides",
    // data
    "caches", "serializes", "deserializes", "indexes", "aggregates", "transforms", "validates",
    "persists", "retrieves", "queries", "filters", "compresses", "decompresses", "encrypts",
    "decrypts", "mutates", "stores", "normalizes", "denormalizes", "partitions", "segments",
    "hashes", "snapshots", "rehydrates", "materializes", "streams", "buffers", "batches",
    "merges", "deduplicates", "sanitizes", "scrubs", "enriches", "flattens", "reshapes",
    // flow control
    "routes", "dispatches", "queues", "schedules", "throttles", "debounces", "redirects",
    "forwards", "broadcasts", "orchestrates", "emits", "mediates", "arbitrates", "sequences",
    "pipelines", "triggers", "gates", "defers", "polls", "pushes", "pulls",
    // security
    "authenticates", "authorizes", "audits", "restricts", "secures", "verifies", "revokes",
    "masks", "signs", "confines", "isolates", "hardens", "whitelists", "blacklists",
    "rate-limits", "challenges",
    // integration
    "exposes", "consumes", "publishes", "subscribes", "integrates", "connects", "interfaces",
    "transmits", "receives", "proxies", "invokes", "brokers", "translates", "adapts", "bridges",
    "relays", "multiplexes", "demultiplexes", "negotiates",
    // lifecycle
    "initializes", "bootstraps", "configures", "migrates", "syncs", "updates", "patches",
    "deletes", "provisions", "decommissions", "monitors", "tracks", "replicates", "tears down",
    "archives", "checkpoints", "resumes", "suspends", "resets", "reconciles", "upgrades",
    "downgrades", "rollbacks", "versions",
    // resilience
    "retries", "falls back", "recovers", "logs", "alerts", "suppresses", "degrades",
    "circuit-breaks", "times out", "catches", "propagates", "swallows", "rethrows",
    "quarantines",
    // resources
    "allocates", "deallocates", "releases", "pools", "limits", "scales", "optimizes",
    "recycles", "meters", "budgets", "rebalances", "reserves", "preloads", "lazy-loads",
    "garbage-collects",
    // observability
    "traces", "spans", "instruments", "samples", "profiles", "measures", "reports", "exports",
    "collects", "aggregates metrics",
];

/// `[WHY/IMPACT]` phrases, matched on word boundaries.
pub const IMPACT_PHRASES: &[&str] = &[
    // causation
    "which", "enabling", "because", "thereby", "thus", "hence", "so that", "resulting in",
    "leading to", "allowing", "allowing for", "due to", "in order to", "consequently",
    "therefore", "as a result", "to ensure", "to support", "to enable", "by means of", "via",
    "through which", "causing", "producing", "yielding",
    // performance
    "reducing latency", "improving throughput", "increasing responsiveness",
    "minimizing overhead", "accelerating", "optimizing", "boosting performance",
    "maximizing efficiency", "reducing processing time", "decreasing load time",
    "improving concurrency", "scaling horizontally", "scaling vertically",
    "handling high load", "reducing network traffic", "minimizing i/o",
    "optimizing memory usage", "reducing cpu usage", "improving cache hit rate",
    "achieving sub-second response", "enabling near real-time processing",
    "reducing database queries", "minimizing round trips",
    // reliability
    "ensuring high availability", "guaranteeing uptime", "improving reliability",
    "enhancing stability", "promoting resilience", "ensuring fault tolerance",
    "preventing downtime", "minimizing service disruption",
    "avoiding single points of failure", "reducing blast radius", "isolating failures",
    "containing errors", "gracefully degrading", "failing safely", "recovering quickly",
    "self-healing",
    // data integrity
    "maintaining consistency", "ensuring data integrity", "guaranteeing atomicity",
    "ensuring durability", "guaranteeing eventual consistency", "preventing data loss",
    "avoiding corruption", "ensuring correctness", "maintaining referential integrity",
    "enforcing constraints", "validating input", "preventing race conditions",
    "ensuring idempotency", "avoiding duplicates", "preserving state",
    "maintaining immutability",
    // security
    "protecting against unauthorized access", "mitigating security risks",
    "hardening the system", "reducing attack surface", "ensuring data privacy",
    "preventing injection attacks", "enforcing least privilege", "ensuring compliance",
    "supporting audit requirements", "protecting sensitive data", "preventing data leakage",
    "meeting regulatory requirements", "enforcing access control",
    // scalability
    "supporting future growth", "enabling horizontal scaling", "facilitating extensibility",
    "supporting increased load", "accommodating more users", "handling traffic spikes",
    "preparing for scale", "future-proofing", "enabling expansion",
    // maintainability
    "simplifying maintenance", "improving readability", "reducing complexity",
    "enhancing modularity", "promoting code reuse", "standardizing patterns",
    "reducing cognitive load", "simplifying debugging", "improving testability",
    "enabling parallel development", "reducing coupling", "increasing cohesion",
    "abstracting implementation details", "simplifying onboarding", "reducing boilerplate",
    "standardizing interfaces", "documenting behavior",
    // business
    "reducing operational cost", "improving time to market", "accelerating feature delivery",
    "supporting business logic", "enabling monetization", "improving customer experience",
    "reducing total cost of ownership", "automating manual processes", "eliminating toil",
    "facilitating rapid iteration", "supporting compliance", "enabling personalization",
    "improving user satisfaction", "reducing support tickets", "increasing conversion rates",
    // operations
    "facilitating rapid deployment", "enabling continuous delivery", "supporting rollback",
    "simplifying disaster recovery", "improving observability", "enabling debugging",
    "facilitating auditing", "supporting troubleshooting", "enabling root cause analysis",
    "providing visibility", "tracking behavior", "measuring impact",
];

static IMPACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = IMPACT_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("impact phrases form a valid regex")
});

/// Check insight text against the quality template.
///
/// Returns every failing reason; an empty list means the text passes.
pub fn check_quality(text: &str, strictness: Strictness) -> Vec<String> {
    let mut reasons = Vec::new();
    let lower = text.to_lowercase();

    let words = text.split_whitespace().count();
    let min_words = strictness.min_words();
    if words < min_words {
        reasons.push(format!("Too short ({words} words, need {min_words}+)"));
    }

    if !ACTION_VERBS.iter().any(|verb| lower.contains(verb)) {
        reasons.push("Missing [WHAT] - no clear action verb found".to_string());
    }

    if strictness.requires_impact() && !IMPACT_RE.is_match(&lower) {
        reasons.push("Missing [WHY/IMPACT] - no consequence or benefit stated".to_string());
    }

    reasons
}

/// Word-set overlap `|A ∩ B| / max(|A|, |B|)` strictly above `threshold`.
pub fn is_near_duplicate(a: &str, b: &str, threshold: f64) -> bool {
    let words_a = word_set(a);
    let words_b = word_set(b);
    if words_a.is_empty() || words_b.is_empty() {
        return false;
    }
    let shared = words_a.intersection(&words_b).count();
    #[allow(clippy::cast_precision_loss)]
    let overlap = shared as f64 / words_a.len().max(words_b.len()) as f64;
    overlap > threshold
}

/// First existing insight that `text` near-duplicates, if any.
pub fn find_duplicate<'a>(text: &str, existing: &'a [String], threshold: f64) -> Option<&'a str> {
    existing
        .iter()
        .find(|e| is_near_duplicate(text, e, threshold))
        .map(String::as_str)
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "Implements token refresh using a Redis cache with sliding window TTL, \
                        which reduces database load and prevents session timeouts";

    #[test]
    fn good_insight_passes() {
        assert!(check_quality(GOOD, Strictness::Standard).is_empty());
    }

    #[test]
    fn all_failures_reported_together() {
        let reasons = check_quality("it is a thing", Strictness::Standard);
        assert_eq!(reasons.len(), 3);
        assert!(reasons[0].starts_with("Too short (4 words"));
        assert!(reasons[1].contains("[WHAT]"));
        assert!(reasons[2].contains("[WHY/IMPACT]"));
    }

    #[test]
    fn action_verb_is_case_insensitive_substring() {
        let text = "The module HANDLES requests for every tenant in the cluster, \
                    which keeps the routing layer small and quite predictable overall";
        assert!(check_quality(text, Strictness::Standard).is_empty());
    }

    #[test]
    fn impact_requires_word_boundary() {
        // "viable" contains "via" but not as a word
        let text = "Implements a viable scheduling approach for background jobs across \
                    all of the worker nodes in the primary cluster today";
        let reasons = check_quality(text, Strictness::Standard);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("[WHY/IMPACT]"));
    }

    #[test]
    fn multi_word_impact_phrase_matches() {
        let text = "Caches compiled templates in process memory keyed by path and mtime \
                    for every request, reducing latency on hot pages";
        assert!(check_quality(text, Strictness::Standard).is_empty());
    }

    #[test]
    fn strictness_changes_floor_and_impact() {
        let text = "Implements retry with jittered backoff for outbound webhook calls everywhere";
        assert_eq!(text.split_whitespace().count(), 10);
        assert!(check_quality(text, Strictness::Lenient).is_empty());
        assert_eq!(check_quality(text, Strictness::Standard).len(), 2);
        assert!(check_quality(GOOD, Strictness::Strict)[0].contains("need 20+"));
    }

    #[test]
    fn near_duplicates_detected() {
        let a = "one two three four five six seven eight nine ten";
        let b = "ONE two three four five six seven eight nine eleven";
        // 9 shared / 10 = 0.9
        assert!(is_near_duplicate(a, b, 0.8));
        let c = "one two three four five six seven eight x y";
        // 8 / 10 = 0.8, not strictly above
        assert!(!is_near_duplicate(a, c, 0.8));
        assert!(!is_near_duplicate("", a, 0.8));
    }

    #[test]
    fn find_duplicate_returns_match() {
        let existing = vec!["alpha beta gamma".to_string(), GOOD.to_string()];
        assert_eq!(find_duplicate(&GOOD.to_uppercase(), &existing, 0.8), Some(GOOD));
        assert_eq!(find_duplicate("delta epsilon", &existing, 0.8), None);
    }
}
