// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request complexity classification.
//!
//! With a text generator bound, the request is classified by the model from a
//! prompt that defines the five tiers. Without one, a deterministic keyword
//! classifier is used. Model failures never propagate: they produce the
//! default MODERATE assessment, which is distinct from the rule-based answer.

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use strata_config::AssessorConfig;
use strata_core::{
    ComplexityAssessment, ComplexityTier, GenerationOptions, Request, StrataError, TextGenerator,
};
use tracing::{debug, warn};

/// Reasoning attached to the failure fallback.
pub const DEFAULT_REASONING: &str = "Default assessment due to classification failure";

/// Acknowledgements and greetings, matched as whole words.
const ACKNOWLEDGEMENT_WORDS: &[&str] = &[
    "thanks", "ty", "ok", "okay", "yes", "yep", "yeah", "sure", "great", "cool",
    "perfect", "awesome", "nice", "hi", "hello", "hey", "bye",
];

/// Acknowledgement phrases, matched as substrings.
const ACKNOWLEDGEMENT_PHRASES: &[&str] = &[
    "thank you",
    "got it",
    "sounds good",
    "makes sense",
    "will do",
    "good job",
];

/// Acknowledgement terms only count in queries of at most this many words.
const ACKNOWLEDGEMENT_MAX_WORDS: usize = 6;

/// Words marking reasoning, planning or analysis requests, matched whole.
const REASONING_WORDS: &[&str] = &[
    "analyze", "analyse", "analyzes", "analyses", "analyzing", "analysing", "analyzed",
    "analysed", "analysis", "analytical",
    "plan", "plans", "planning", "planned",
    "strategy", "strategies", "strategic", "strategize",
    "design", "designs", "designing", "designed",
    "architect", "architecture", "architectures", "architectural",
    "compare", "compares", "comparing", "compared", "comparison", "comparisons",
    "evaluate", "evaluates", "evaluating", "evaluated", "evaluation",
    "reasoning",
    "optimize", "optimise", "optimizes", "optimizing", "optimising", "optimized",
    "optimization", "optimisation",
    "tradeoff", "tradeoffs", "trade-off", "trade-offs",
    "implement", "implements", "implementing", "implementation",
    "debug", "debugging",
    "investigate", "investigating", "investigation",
    "research", "researching",
    "prove", "proof",
    "derive", "deriving", "derivation",
];

/// Reasoning phrases, matched as substrings.
const REASONING_PHRASES: &[&str] = &["step by step", "pros and cons", "in depth", "root cause"];

/// Tier definitions used in the classification prompt.
const TIER_DEFINITIONS: &str = "\
- DIRECT_RESPONSE: acknowledgements, greetings and thanks that need no real answer.
- ATOMIC: a single fact, definition or short lookup answerable in a sentence or two.
- MODERATE: explanations or how-to questions that benefit from some structured thinking.
- COMPLEX: multi-step reasoning, planning, design or analysis across several concerns.
- EXPERT: deep specialist work where expert-level rigor is explicitly required.";

/// Classifies requests into complexity tiers.
pub struct ComplexityAssessor {
    generator: Option<Arc<dyn TextGenerator>>,
    config: AssessorConfig,
}

impl ComplexityAssessor {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: AssessorConfig) -> Self {
        Self { generator, config }
    }

    /// A classifier that only ever uses the keyword rules.
    pub fn rule_based_only() -> Self {
        Self::new(None, AssessorConfig::default())
    }

    /// Whether classification goes through the generator.
    pub fn uses_model(&self) -> bool {
        self.config.use_llm && self.generator.is_some()
    }

    /// Classify a request. Never fails.
    pub async fn assess(&self, request: &Request) -> ComplexityAssessment {
        let generator = match &self.generator {
            Some(g) if self.config.use_llm => g,
            _ => return rule_based(&request.content),
        };

        match self.classify_with_model(generator.as_ref(), &request.content).await {
            Ok(assessment) => {
                debug!(
                    request_id = %request.id,
                    tier = %assessment.tier,
                    "model classification succeeded"
                );
                assessment
            }
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "classification failed, using default");
                self.default_assessment()
            }
        }
    }

    async fn classify_with_model(
        &self,
        generator: &dyn TextGenerator,
        query: &str,
    ) -> Result<ComplexityAssessment, StrataError> {
        let options = GenerationOptions {
            temperature: self.config.temperature,
            top_p: 0.9,
            top_k: 20,
            max_tokens: self.config.max_tokens,
        };
        let output = generator
            .generate(&classification_prompt(query), &options)
            .await?;
        parse_assessment(&output)
    }

    /// The assessment used when model classification fails.
    pub fn default_assessment(&self) -> ComplexityAssessment {
        ComplexityAssessment {
            tier: ComplexityTier::Moderate,
            estimated_time_ms: self.config.default_estimate_ms,
            reasoning: DEFAULT_REASONING.to_string(),
        }
    }
}

fn classification_prompt(query: &str) -> String {
    format!(
        "Classify the complexity of the user request below into exactly one tier.\n\n\
         Tiers:\n{TIER_DEFINITIONS}\n\n\
         Respond with a single JSON object and nothing else:\n\
         {{\"complexity\": \"<TIER>\", \"estimatedTimeMs\": <number>, \"reasoning\": \"<one sentence>\"}}\n\n\
         Request: {query}"
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAssessment {
    complexity: String,
    estimated_time_ms: serde_json::Value,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Parse the first JSON object in model output into an assessment.
pub fn parse_assessment(output: &str) -> Result<ComplexityAssessment, StrataError> {
    let start = output
        .find('{')
        .ok_or_else(|| StrataError::Classification("no JSON object in output".into()))?;

    let raw: RawAssessment = serde_json::Deserializer::from_str(&output[start..])
        .into_iter::<RawAssessment>()
        .next()
        .ok_or_else(|| StrataError::Classification("empty JSON stream".into()))?
        .map_err(|e| StrataError::Classification(format!("malformed assessment: {e}")))?;

    let tier = ComplexityTier::from_str(raw.complexity.trim().to_uppercase().as_str())
        .map_err(|_| {
            StrataError::Classification(format!("unknown complexity `{}`", raw.complexity))
        })?;

    let estimated = raw
        .estimated_time_ms
        .as_f64()
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .ok_or_else(|| {
            StrataError::Classification(format!(
                "estimatedTimeMs must be a non-negative number, got {}",
                raw.estimated_time_ms
            ))
        })?;

    Ok(ComplexityAssessment {
        tier,
        estimated_time_ms: estimated.round() as u64,
        reasoning: raw
            .reasoning
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "Classified by model".to_string()),
    })
}

/// Keyword classification. First matching rule wins.
pub fn rule_based(query: &str) -> ComplexityAssessment {
    let lower = query.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();

    let acknowledges = words.len() <= ACKNOWLEDGEMENT_MAX_WORDS
        && (words.iter().any(|w| ACKNOWLEDGEMENT_WORDS.contains(w))
            || ACKNOWLEDGEMENT_PHRASES.iter().any(|p| lower.contains(p)));
    if acknowledges {
        return assessment(
            ComplexityTier::DirectResponse,
            2_000,
            "Acknowledgement or greeting; no substantive answer needed",
        );
    }

    let reasons = words.iter().any(|w| REASONING_WORDS.contains(w))
        || REASONING_PHRASES.iter().any(|p| lower.contains(p));

    if words.len() < 10 && !reasons {
        return assessment(
            ComplexityTier::Atomic,
            10_000,
            "Short query without reasoning keywords",
        );
    }
    if reasons {
        return assessment(
            ComplexityTier::Complex,
            180_000,
            "Query asks for reasoning, planning or analysis",
        );
    }
    assessment(
        ComplexityTier::Moderate,
        30_000,
        "Longer query without reasoning keywords",
    )
}

fn assessment(tier: ComplexityTier, estimated_time_ms: u64, reasoning: &str) -> ComplexityAssessment {
    ComplexityAssessment {
        tier,
        estimated_time_ms,
        reasoning: reasoning.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strata_test_utils::MockGenerator;
    use tracing_test::traced_test;

    #[test]
    fn rule_branches() {
        let ack = rule_based("thank you!");
        assert_eq!(ack.tier, ComplexityTier::DirectResponse);
        assert_eq!(ack.estimated_time_ms, 2_000);

        let short = rule_based("What is the capital of France?");
        assert_eq!(short.tier, ComplexityTier::Atomic);
        assert_eq!(short.estimated_time_ms, 10_000);

        let analysis = rule_based("Analyze our deployment pipeline");
        assert_eq!(analysis.tier, ComplexityTier::Complex);
        assert_eq!(analysis.estimated_time_ms, 180_000);

        let long = rule_based(
            "Tell me about the history of the printing press in Europe during the fifteenth century",
        );
        assert_eq!(long.tier, ComplexityTier::Moderate);
        assert_eq!(long.estimated_time_ms, 30_000);
    }

    #[test]
    fn acknowledgement_needs_whole_word() {
        // Prefix overlap with "thanks" does not count.
        assert_eq!(rule_based("think").tier, ComplexityTier::Atomic);
        assert_eq!(rule_based("ok").tier, ComplexityTier::DirectResponse);
        assert_eq!(rule_based("Got it, cheers").tier, ComplexityTier::DirectResponse);
    }

    #[test]
    fn reasoning_words_match_whole() {
        assert_eq!(rule_based("What is the largest planet?").tier, ComplexityTier::Atomic);
        assert_eq!(rule_based("Is that a reasonable price?").tier, ComplexityTier::Atomic);
        assert_eq!(rule_based("Has this been proven?").tier, ComplexityTier::Atomic);
        assert_eq!(rule_based("We are planning a migration").tier, ComplexityTier::Complex);
        assert_eq!(rule_based("Compare these options").tier, ComplexityTier::Complex);
    }

    #[test]
    fn long_queries_are_not_acknowledgements() {
        let query = "Great, now analyze the failure modes of our replication \
                     setup across both regions";
        assert_ne!(rule_based(query).tier, ComplexityTier::DirectResponse);
        assert_eq!(rule_based(query).tier, ComplexityTier::Complex);

        let chatty = "Sure, tell me about the history of the printing press in Europe";
        assert_eq!(rule_based(chatty).tier, ComplexityTier::Moderate);

        assert_eq!(rule_based("Great, thanks!").tier, ComplexityTier::DirectResponse);
    }

    #[test]
    fn parses_json_wrapped_in_prose() {
        let output = r#"Sure! {"complexity": "complex", "estimatedTimeMs": 120000.4, "reasoning": "multi-step"} Hope that helps {}"#;
        let parsed = parse_assessment(output).unwrap();
        assert_eq!(parsed.tier, ComplexityTier::Complex);
        assert_eq!(parsed.estimated_time_ms, 120_000);
        assert_eq!(parsed.reasoning, "multi-step");
    }

    #[test]
    fn rejects_invalid_model_output() {
        assert!(parse_assessment("no json here").is_err());
        assert!(parse_assessment(r#"{"complexity": "TRIVIAL", "estimatedTimeMs": 1}"#).is_err());
        assert!(
            parse_assessment(r#"{"complexity": "ATOMIC", "estimatedTimeMs": "soon"}"#).is_err()
        );
        assert!(parse_assessment(r#"{"complexity": "ATOMIC", "estimatedTimeMs": -5}"#).is_err());
    }

    #[tokio::test]
    async fn model_path_uses_parsed_output() {
        let generator = Arc::new(MockGenerator::with_responses([
            r#"{"complexity": "EXPERT", "estimatedTimeMs": 600000, "reasoning": "specialist"}"#,
        ]));
        let assessor = ComplexityAssessor::new(Some(generator.clone()), AssessorConfig::default());
        let result = assessor.assess(&Request::new("thanks", "u")).await;
        assert_eq!(result.tier, ComplexityTier::Expert);

        let prompts = generator.prompts().await;
        assert!(prompts[0].prompt.contains("Request: thanks"));
        assert_eq!(prompts[0].options.temperature, 0.1);
        assert_eq!(prompts[0].options.max_tokens, 200);
    }

    #[tokio::test]
    #[traced_test]
    async fn model_failure_yields_default_not_rules() {
        let assessor = ComplexityAssessor::new(
            Some(Arc::new(MockGenerator::failing())),
            AssessorConfig::default(),
        );
        let result = assessor.assess(&Request::new("thanks", "u")).await;
        assert_eq!(result.tier, ComplexityTier::Moderate);
        assert_eq!(result.estimated_time_ms, 30_000);
        assert_eq!(result.reasoning, DEFAULT_REASONING);
        assert!(logs_contain("classification failed"));
    }

    #[tokio::test]
    async fn disabled_model_uses_rules() {
        let generator = Arc::new(MockGenerator::new());
        let config = AssessorConfig {
            use_llm: false,
            ..AssessorConfig::default()
        };
        let assessor = ComplexityAssessor::new(Some(generator.clone()), config);
        assert!(!assessor.uses_model());
        let result = assessor.assess(&Request::new("thank you", "u")).await;
        assert_eq!(result.tier, ComplexityTier::DirectResponse);
        assert_eq!(generator.call_count().await, 0);
    }

    proptest! {
        #[test]
        fn rule_based_is_deterministic(query in ".{0,300}") {
            prop_assert_eq!(rule_based(&query), rule_based(&query));
        }

        #[test]
        fn short_plain_queries_are_atomic(words in prop::collection::vec("[b-df-hj-np-tv-xz]{3,8}", 1..9)) {
            // Consonant-only words avoid every keyword list.
            let query = words.join(" ");
            prop_assert_eq!(rule_based(&query).tier, ComplexityTier::Atomic);
        }
    }
}
