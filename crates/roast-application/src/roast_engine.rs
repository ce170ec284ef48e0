//! Response selection: prompt rendering, the provider call and the canned
//! fallback.

use minijinja::{Environment, context};
use roast_core::error::{Result, RoastError};
use roast_core::generation::Generator;
use roast_core::random::RandomSource;
use roast_core::roast::{
    HISTORY_WINDOW, RoastRequest, RoastResponse, TASK_TYPE_CONFESSION, fallback_opening_question,
    fallback_roast, should_trigger_task,
};
use roast_core::session::{Message, RoastTier, Sender, escalate_tier};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const ROAST_TEMPLATE_NAME: &str = "roast_prompt.txt";
const OPENING_TEMPLATE_NAME: &str = "opening_prompt.txt";

const THERAPIST_LABEL: &str = "!THERAPIST";
const USER_LABEL: &str = "User";

const ROAST_TEMPLATE: &str = r#"You are !THERAPIST, a satirical AI therapist who gives brutally honest, sarcastic responses followed by therapeutic follow-up questions.

IMPORTANT RULES:
1. You are NOT a real therapist - this is satirical entertainment
2. Be sarcastic and brutally honest, but not genuinely harmful
3. ALWAYS end your response with a follow-up question to keep the conversation going
4. Your roast level should be: {{ tier }}
5. Include relevant emojis but don't overdo it

TARGET ROAST LEVEL: {{ tier }}
{% for level in levels -%}
- {{ level.name }}: {{ level.guidance }}
{% endfor %}
CONVERSATION CONTEXT:
{% if main_problem %}The user's main problem: {{ main_problem }}{% endif %}

RECENT CONVERSATION:
{% for line in history -%}
{{ line.speaker }}: {{ line.content }}
{% endfor %}
USER'S LATEST MESSAGE: "{{ user_message }}"

Your response should:
1. Start with a roast/sarcastic response to what they just said
2. Include some "therapeutic insight" (that's actually just more roasting)
3. End with a follow-up question that digs deeper or moves the conversation forward
4. Be 2-4 sentences total
5. Match the {{ tier }} intensity level

RESPONSE FORMAT:
[Your roast/sarcastic response] [Some fake therapeutic insight] [Follow-up question]

Generate a response now:"#;

const OPENING_TEMPLATE: &str = r#"You are !THERAPIST, a satirical AI therapist character who is intentionally unhelpful and sarcastic. You're designed to be entertaining, not actually helpful.

Your role is to ask a single opening question that sounds like something a real therapist would ask at the beginning of a session, but with your own sarcastic twist.

Generate ONE opening question that:
1. Sounds professional and therapeutic initially
2. Has a slight sarcastic or cynical edge
3. Is open-ended to get people talking about their problems
4. Is something a real therapist might actually ask
5. Don't make it too mean - save the harsh roasting for later responses

Generate ONE opening question in this style. Keep it under {{ max_chars }} characters. No emojis in the opening question."#;

const OPENING_MAX_CHARS: usize = 150;

#[derive(Serialize)]
struct HistoryLine<'a> {
    speaker: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct TierLevel {
    name: String,
    guidance: &'static str,
}

/// Picks what the therapist says next.
///
/// Tries the generator first; on any failure (provider error, blank text,
/// template error) it falls back to a canned line of the same tier. The
/// task gate is drawn on both paths.
#[derive(Clone)]
pub struct RoastEngine {
    generator: Arc<dyn Generator>,
    templates: Arc<Environment<'static>>,
}

impl RoastEngine {
    pub fn new(generator: Arc<dyn Generator>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(ROAST_TEMPLATE_NAME, ROAST_TEMPLATE)
            .map_err(|e| RoastError::template(e.to_string()))?;
        env.add_template(OPENING_TEMPLATE_NAME, OPENING_TEMPLATE)
            .map_err(|e| RoastError::template(e.to_string()))?;
        Ok(Self {
            generator,
            templates: Arc::new(env),
        })
    }

    /// Renders the roast prompt for `request` at `tier`.
    pub fn render_roast_prompt(&self, request: &RoastRequest, tier: RoastTier) -> Result<String> {
        let window_start = request.history.len().saturating_sub(HISTORY_WINDOW);
        let history: Vec<HistoryLine> = request.history[window_start..]
            .iter()
            .map(history_line)
            .collect();
        let levels: Vec<TierLevel> = [RoastTier::Mild, RoastTier::Medium, RoastTier::Nuclear]
            .into_iter()
            .map(|level| TierLevel {
                name: level.as_str().to_uppercase(),
                guidance: level.guidance(),
            })
            .collect();

        self.render(
            ROAST_TEMPLATE_NAME,
            context! {
                tier => tier.as_str().to_uppercase(),
                levels => levels,
                main_problem => request.session.main_problem(),
                history => history,
                user_message => request.user_message.as_str(),
            },
        )
    }

    /// Produces the reply to one user message.
    pub async fn respond(&self, request: RoastRequest, rng: &dyn RandomSource) -> RoastResponse {
        let session = &request.session;
        let tier = escalate_tier(session.message_count, session.has_hit_paywall);

        let generated = match self.render_roast_prompt(&request, tier) {
            Ok(prompt) => self.generate_trimmed(&prompt).await,
            Err(e) => {
                warn!("Failed to render roast prompt: {}", e);
                None
            }
        };

        let should_trigger_task = should_trigger_task(session.message_count, rng);
        let task_type = should_trigger_task.then(|| TASK_TYPE_CONFESSION.to_string());

        match generated {
            Some(content) => RoastResponse {
                content,
                tier,
                should_trigger_task,
                task_type,
                is_fallback: false,
            },
            None => RoastResponse {
                content: fallback_roast(tier, rng),
                tier,
                should_trigger_task,
                task_type,
                is_fallback: true,
            },
        }
    }

    /// Opening question for a fresh session.
    pub async fn opening_question(&self, rng: &dyn RandomSource) -> String {
        let prompt = match self.render(
            OPENING_TEMPLATE_NAME,
            context! { max_chars => OPENING_MAX_CHARS },
        ) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Failed to render opening prompt: {}", e);
                return fallback_opening_question(rng);
            }
        };

        match self.generate_trimmed(&prompt).await {
            Some(question) => question,
            None => fallback_opening_question(rng),
        }
    }

    async fn generate_trimmed(&self, prompt: &str) -> Option<String> {
        match self.generator.generate(prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!("Generator returned blank text; using fallback");
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                warn!(transient = e.is_transient(), "Generation failed, using fallback: {}", e);
                None
            }
        }
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        let rendered = self
            .templates
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|e| RoastError::template(e.to_string()))?;
        debug!(template = name, chars = rendered.len(), "Rendered prompt");
        Ok(rendered)
    }
}

fn history_line(message: &Message) -> HistoryLine<'_> {
    HistoryLine {
        speaker: match message.sender {
            Sender::User => USER_LABEL,
            Sender::Ai => THERAPIST_LABEL,
        },
        content: &message.content,
    }
}
