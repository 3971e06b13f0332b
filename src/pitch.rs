//! Marketing pitch generation.
//!
//! Two strategies implement [`PitchGenerator`]: the OpenAI-backed one and a
//! deterministic template. [`PitchService`] is chosen once at startup and
//! always returns a complete pitch, whichever strategy produced it.

use crate::config::Config;
use crate::llm_client::{GenerationError, OpenAiClient};
use crate::models::{BusinessIntelligence, MarketingPitch};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_AGENT_NAME: &str = "Forge Assistant";

pub const PITCH_TEMPERATURE: f32 = 0.7;
pub const PITCH_MAX_TOKENS: u32 = 1000;

const REQUIRED_FIELDS: [&str; 5] = [
    "headline",
    "subheadline",
    "key_benefits",
    "call_to_action",
    "personalized_insights",
];

const GENERIC_CONTEXT: &str = "General business seeking AI consultation services";

const SYSTEM_PROMPT: &str = "You are a marketing expert who creates compelling pitches for AI agent conversations. Always respond with valid JSON.";

/// A way of turning business intelligence into a pitch.
#[async_trait]
pub trait PitchGenerator: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Whether this generator can be used at all. No network calls.
    fn is_available(&self) -> bool;

    async fn generate_pitch(
        &self,
        bi: &BusinessIntelligence,
        agent_name: &str,
    ) -> Result<MarketingPitch, GenerationError>;
}

/// Asks an OpenAI chat model for the pitch and validates its JSON.
pub struct OpenAiPitchGenerator {
    client: OpenAiClient,
}

impl OpenAiPitchGenerator {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PitchGenerator for OpenAiPitchGenerator {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate_pitch(
        &self,
        bi: &BusinessIntelligence,
        agent_name: &str,
    ) -> Result<MarketingPitch, GenerationError> {
        let context = build_business_context(bi);
        let prompt = build_prompt(&context, agent_name);

        let content = self
            .client
            .chat_completion(SYSTEM_PROMPT, &prompt, PITCH_TEMPERATURE, PITCH_MAX_TOKENS)
            .await?;

        parse_pitch_response(&content)
    }
}

/// Template pitch built only from company name and industry.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPitchGenerator;

impl FallbackPitchGenerator {
    pub fn pitch(&self, bi: &BusinessIntelligence, agent_name: &str) -> MarketingPitch {
        let company_name = non_empty_or(&bi.company_name, "your company");
        let industry = non_empty_or(&bi.industry, "your industry");

        MarketingPitch {
            headline: format!("Transform {} with AI", company_name),
            subheadline: format!("Personalized AI solutions for {} businesses", industry),
            key_benefits: vec![
                "Streamline operations with intelligent automation".to_string(),
                "Make data-driven decisions with AI insights".to_string(),
                "Enhance customer experience with personalized interactions".to_string(),
                "Reduce costs through efficient AI-powered processes".to_string(),
            ],
            call_to_action: format!("Start a conversation with {} now", agent_name),
            personalized_insights: vec![
                format!("Understanding the unique challenges in {}", industry),
                format!("Tailored solutions for {}'s specific needs", company_name),
                "Proven results across similar businesses".to_string(),
            ],
            social_proof: Some("Trusted by leading companies worldwide".to_string()),
        }
    }
}

#[async_trait]
impl PitchGenerator for FallbackPitchGenerator {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn generate_pitch(
        &self,
        bi: &BusinessIntelligence,
        agent_name: &str,
    ) -> Result<MarketingPitch, GenerationError> {
        Ok(self.pitch(bi, agent_name))
    }
}

/// Best-effort pitch generation that never fails.
#[derive(Clone)]
pub struct PitchService {
    primary: Option<Arc<dyn PitchGenerator>>,
    fallback: FallbackPitchGenerator,
}

impl PitchService {
    /// Installs the OpenAI generator when a credential is configured.
    pub fn from_config(config: &Config) -> Self {
        let Some(api_key) = config.openai_api_key.as_deref() else {
            tracing::info!("Pitch generation running in fallback-only mode (no OPENAI_API_KEY)");
            return Self::fallback_only();
        };

        match OpenAiClient::new(
            config.openai_base_url.clone(),
            api_key,
            config.openai_model.clone(),
            Duration::from_secs(config.pitch_timeout_secs),
        ) {
            Ok(client) => {
                tracing::info!("✓ OpenAI pitch generator initialized (model: {})", client.model());
                Self::with_generator(Arc::new(OpenAiPitchGenerator::new(client)))
            }
            Err(e) => {
                tracing::error!("Failed to initialize OpenAI client, using fallback pitches: {}", e);
                Self::fallback_only()
            }
        }
    }

    pub fn with_generator(generator: Arc<dyn PitchGenerator>) -> Self {
        Self {
            primary: Some(generator),
            fallback: FallbackPitchGenerator,
        }
    }

    pub fn fallback_only() -> Self {
        Self {
            primary: None,
            fallback: FallbackPitchGenerator,
        }
    }

    /// True when an AI generator is configured. Readiness reporting only.
    pub fn is_available(&self) -> bool {
        self.primary.as_ref().is_some_and(|g| g.is_available())
    }

    /// One attempt with the primary generator, then the template on any failure.
    pub async fn generate_pitch(&self, bi: &BusinessIntelligence, agent_name: &str) -> MarketingPitch {
        let agent_name = non_empty_or(agent_name, DEFAULT_AGENT_NAME);

        if let Some(generator) = self.primary.as_ref().filter(|g| g.is_available()) {
            match generator.generate_pitch(bi, agent_name).await {
                Ok(pitch) => {
                    tracing::info!(
                        "Generated marketing pitch for {} via {}",
                        bi.company_name,
                        generator.name()
                    );
                    return pitch;
                }
                Err(e) => {
                    tracing::warn!(
                        "Pitch generation via {} failed for {}, using fallback: {}",
                        generator.name(),
                        bi.company_name,
                        e
                    );
                }
            }
        }

        self.fallback.pitch(bi, agent_name)
    }
}

/// Present fields of `bi`, one `Label: value` line each.
pub fn build_business_context(bi: &BusinessIntelligence) -> String {
    let mut parts: Vec<String> = Vec::new();

    push_text(&mut parts, "Company", &bi.company_name);
    push_text(&mut parts, "Industry", &bi.industry);
    push_text(&mut parts, "Description", &bi.description);
    push_text(&mut parts, "Location", &bi.location);
    if let Some(count) = bi.employee_count {
        parts.push(format!("Employee Count: {}", count));
    }
    push_opt(&mut parts, "Revenue Range", &bi.revenue_range);
    push_text(&mut parts, "Website", &bi.website);
    push_list(&mut parts, "Key Products/Services", &bi.key_products);
    push_opt(&mut parts, "Target Audience", &bi.target_audience);
    push_list(&mut parts, "Competitors", &bi.competitors);
    push_list(&mut parts, "Pain Points", &bi.pain_points);
    push_list(&mut parts, "Business Goals", &bi.goals);
    push_opt(&mut parts, "Budget Range", &bi.budget_range);
    push_opt(&mut parts, "Timeline", &bi.timeline);

    let decision_makers: Vec<String> = bi
        .decision_makers
        .iter()
        .filter(|dm| !dm.name.trim().is_empty())
        .map(|dm| {
            if dm.role.trim().is_empty() {
                dm.name.clone()
            } else {
                format!("{} ({})", dm.name, dm.role)
            }
        })
        .collect();
    push_list(&mut parts, "Key Decision Makers", &decision_makers);

    let news: Vec<String> = bi
        .recent_news
        .iter()
        .take(3)
        .map(|item| item.title.clone())
        .filter(|title| !title.trim().is_empty())
        .collect();
    if !news.is_empty() {
        parts.push(format!("Recent News: {}", news.join("; ")));
    }

    if parts.is_empty() {
        GENERIC_CONTEXT.to_string()
    } else {
        parts.join("\n")
    }
}

pub fn build_prompt(business_context: &str, agent_name: &str) -> String {
    format!(
        r#"You are a marketing copywriter specializing in AI agent introductions. Based on the following business intelligence about a company, create a compelling marketing pitch that encourages visitors to start an AI agent conversation.

Business Context:
{business_context}

Agent Name: {agent_name}

Create a marketing pitch with these elements:
1. A compelling headline (max 10 words)
2. A persuasive subheadline (max 20 words)
3. 3-5 key benefits specifically tailored to this business
4. A clear call-to-action for starting the conversation
5. 2-3 personalized insights showing you understand their business
6. Optional social proof element if relevant

The pitch should:
- Be conversational and approachable
- Show deep understanding of their industry and challenges
- Highlight how AI can specifically help their business
- Create urgency and excitement about starting the conversation
- Use their company name and industry-specific language

Format your response as valid JSON with these exact keys:
{{
  "headline": "string",
  "subheadline": "string",
  "key_benefits": ["string1", "string2", "string3"],
  "call_to_action": "string",
  "personalized_insights": ["string1", "string2"],
  "social_proof": "string (optional)"
}}"#
    )
}

/// Validates a model reply into a pitch.
///
/// Tolerates a markdown code fence around the JSON. Text fields must be
/// non-empty strings; list fields that are not lists become empty.
pub fn parse_pitch_response(content: &str) -> Result<MarketingPitch, GenerationError> {
    let value: Value = serde_json::from_str(strip_code_fences(content))?;
    let obj = value.as_object().ok_or_else(|| {
        GenerationError::InvalidStructure("expected a JSON object".to_string())
    })?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        return Err(GenerationError::InvalidStructure(format!(
            "missing {}",
            missing
        )));
    }

    Ok(MarketingPitch {
        headline: required_text(obj, "headline")?,
        subheadline: required_text(obj, "subheadline")?,
        key_benefits: text_list(obj, "key_benefits"),
        call_to_action: required_text(obj, "call_to_action")?,
        personalized_insights: text_list(obj, "personalized_insights"),
        social_proof: obj
            .get("social_proof")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    })
}

/// Removes a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn required_text(obj: &Map<String, Value>, field: &str) -> Result<String, GenerationError> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GenerationError::InvalidStructure(format!("{} must be a non-empty string", field)))
}

fn text_list(obj: &Map<String, Value>, field: &str) -> Vec<String> {
    obj.get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn push_text(parts: &mut Vec<String>, label: &str, value: &str) {
    if !value.trim().is_empty() {
        parts.push(format!("{}: {}", label, value));
    }
}

fn push_opt(parts: &mut Vec<String>, label: &str, value: &Option<String>) {
    if let Some(v) = value {
        push_text(parts, label, v);
    }
}

fn push_list(parts: &mut Vec<String>, label: &str, values: &[String]) {
    if !values.is_empty() {
        parts.push(format!("{}: {}", label, values.join(", ")));
    }
}
