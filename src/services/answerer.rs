//! Answer composition and confidence scoring.
//!
//! Evidence is rendered into timestamped context lines, handed to the
//! generation provider when one is configured, and otherwise (or on any
//! provider failure) summarized extractively.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{AnswerMode, EvidenceItem, RagConfig, RagResult, SourceRef};
use crate::domain::ports::{GenerationProvider, GenerationRequest};
use crate::infrastructure::logging::scrub_secrets;

/// Answer returned when nothing passed the retrieval policy.
pub const NO_EVIDENCE_ANSWER: &str = "未在会议记录中找到与该问题相关的内容。";

/// Lines quoted by the extractive fallback.
pub const EXTRACTIVE_LINES: usize = 3;

/// Evidence count at which the coverage factor saturates.
const FULL_COVERAGE_EVIDENCE: f32 = 3.0;

/// Confidence multiplier when the answer hedges.
const HEDGE_PENALTY: f32 = 0.8;

/// Phrases that mark an answer as uncertain. Matched case-insensitively.
pub const HEDGING_PHRASES: &[&str] = &[
    "可能",
    "也许",
    "大概",
    "似乎",
    "不确定",
    "不太清楚",
    "无法确定",
    "might",
    "maybe",
    "possibly",
    "perhaps",
    "not sure",
    "unclear",
];

const SYSTEM_PROMPT: &str = "你是一个会议内容助手。只根据提供的会议记录片段回答问题，\
不要补充记录中没有的信息。引用内容时标注对应的时间戳，例如 [03:15]。\
回答要简洁。使用与问题相同的语言作答，默认使用中文。";

const EXTRACTIVE_HEADER: &str = "根据会议记录，找到以下相关内容：";

const EXTRACTIVE_DISCLAIMER: &str = "注：当前为基础检索模式，以上内容直接摘自会议记录，未经模型总结。";

/// Context assembled from ranked evidence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextBlock {
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl ContextBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Format seconds as `mm:ss`. Minutes are not wrapped into hours.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// One `[mm:ss] speaker: text` line.
pub fn context_line(item: &EvidenceItem) -> String {
    format!(
        "[{}] {}: {}",
        format_timestamp(item.record.timestamp_seconds),
        item.record.speaker,
        item.record.text
    )
}

/// Render evidence in ranked order, stopping before the joined text would
/// exceed `max_length` characters.
///
/// If even the first line is too long it is cut to `max_length` so the
/// answer still has something to ground on.
pub fn build_context(evidence: &[EvidenceItem], max_length: usize) -> ContextBlock {
    let mut block = ContextBlock::default();
    let mut used = 0usize;

    for item in evidence {
        let line = context_line(item);
        let separator = usize::from(!block.lines.is_empty());
        let line_len = line.chars().count();

        if used + separator + line_len > max_length {
            block.truncated = true;
            if block.lines.is_empty() && max_length > 0 {
                block.lines.push(line.chars().take(max_length).collect());
            }
            break;
        }

        used += separator + line_len;
        block.lines.push(line);
    }

    block
}

/// Whether `answer` contains any hedging phrase.
pub fn contains_hedge(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    HEDGING_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

/// `avg(similarity) * min(n / 3, 1) * hedge_penalty`, clamped to `[0, 1]`.
pub fn confidence_score(evidence: &[EvidenceItem], answer: &str) -> f32 {
    if evidence.is_empty() {
        return 0.0;
    }

    let n = evidence.len() as f32;
    let average = evidence.iter().map(|e| e.similarity).sum::<f32>() / n;
    let coverage = (n / FULL_COVERAGE_EVIDENCE).min(1.0);
    let hedge = if contains_hedge(answer) { HEDGE_PENALTY } else { 1.0 };

    (average * coverage * hedge).clamp(0.0, 1.0)
}

/// Deterministic answer quoting the top context lines.
pub fn extractive_answer(context: &ContextBlock) -> String {
    let mut answer = String::from(EXTRACTIVE_HEADER);
    for (i, line) in context.lines.iter().take(EXTRACTIVE_LINES).enumerate() {
        answer.push_str(&format!("\n{}. {line}", i + 1));
    }

    let remaining = context.lines.len().saturating_sub(EXTRACTIVE_LINES);
    if remaining > 0 {
        answer.push_str(&format!("\n（另有 {remaining} 条相关记录未列出）"));
    }

    answer.push_str("\n\n");
    answer.push_str(EXTRACTIVE_DISCLAIMER);
    answer
}

/// User prompt carrying the question and the rendered context.
pub fn user_prompt(question: &str, context: &str, current_meeting_id: Option<&str>) -> String {
    let mut prompt = String::new();
    if let Some(meeting_id) = current_meeting_id {
        prompt.push_str(&format!("当前会议：{meeting_id}\n\n"));
    }
    prompt.push_str(&format!("会议记录片段：\n{context}\n\n问题：{question}"));
    prompt
}

/// Result returned when retrieval produced no evidence.
pub fn no_evidence_result() -> RagResult {
    RagResult {
        answer: NO_EVIDENCE_ANSWER.to_string(),
        sources: Vec::new(),
        used_context_text: String::new(),
        confidence: 0.0,
        context_truncated: false,
        mode: AnswerMode::NoEvidence,
    }
}

/// Composes answers from ranked evidence.
pub struct Answerer {
    generator: Arc<dyn GenerationProvider>,
    timeout: Duration,
}

impl Answerer {
    pub fn new(generator: Arc<dyn GenerationProvider>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub fn is_remote_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Answer `question` from `evidence`. Never fails.
    pub async fn answer(
        &self,
        question: &str,
        evidence: &[EvidenceItem],
        current_meeting_id: Option<&str>,
        config: &RagConfig,
    ) -> RagResult {
        if evidence.is_empty() {
            return no_evidence_result();
        }

        let context = build_context(evidence, config.max_context_length);
        let context_text = context.text();

        let (answer, mode) = if self.generator.is_configured() {
            let request = GenerationRequest {
                system_prompt: SYSTEM_PROMPT.to_string(),
                user_prompt: user_prompt(question, &context_text, current_meeting_id),
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            };
            match self.generate(&request).await {
                Ok(text) => (text, AnswerMode::Generated),
                Err(err) => {
                    warn!(
                        provider = self.generator.name(),
                        kind = err.kind(),
                        error = %scrub_secrets(&err.to_string()),
                        "generation failed, using extractive answer"
                    );
                    (extractive_answer(&context), AnswerMode::Extractive)
                }
            }
        } else {
            debug!("no generation provider configured, using extractive answer");
            (extractive_answer(&context), AnswerMode::Extractive)
        };

        let confidence = confidence_score(evidence, &answer);

        RagResult {
            answer,
            sources: evidence.iter().map(SourceRef::from).collect(),
            used_context_text: context_text,
            confidence,
            context_truncated: context.truncated,
            mode,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> ProviderResult<String> {
        tokio::time::timeout(self.timeout, self.generator.generate(request))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
    }
}
