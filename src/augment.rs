use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::classifier::evaluate;
use crate::config::Thresholds;
use crate::context::render_prompt;
use crate::domain::{
    suggestion_id, FarmContext, Notice, SensorCategory, Severity, Suggestion,
};
use crate::error::AdviceError;

/// Partial suggestion fields returned by an advice generator.
/// The augmenter stamps farm name, id, and the contextual flag.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceDraft {
    pub category: SensorCategory,
    pub sensor_type: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub recommended_action: Option<String>,
    pub value: f64,
    pub unit: String,
    pub observed_at: DateTime<Utc>,
}

/// External advice-generation collaborator, one call per farm context.
///
/// `prompt` is the rendered textual context; implementations backed by a
/// remote text generator can send it verbatim, while local implementations
/// may work from the structured context directly.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn generate(
        &self,
        context: &FarmContext,
        prompt: &str,
    ) -> Result<Vec<AdviceDraft>, AdviceError>;
}

/// Default generator: runs purely locally, no network call.
///
/// Re-evaluates each latest value against the rule tables (independently of
/// the classifier) and drafts advice for anything outside the safe band,
/// folding the farmer's free-text notes into the description when present.
#[derive(Debug, Clone, Default)]
pub struct NotesAdviceGenerator {
    thresholds: Thresholds,
}

impl NotesAdviceGenerator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }
}

#[async_trait]
impl AdviceGenerator for NotesAdviceGenerator {
    async fn generate(
        &self,
        context: &FarmContext,
        _prompt: &str,
    ) -> Result<Vec<AdviceDraft>, AdviceError> {
        let mut drafts = Vec::new();
        for (category, snapshot) in &context.sensor_values {
            let Some(hit) = evaluate(*category, snapshot.value, &self.thresholds) else {
                continue;
            };
            // Success means the value sits in the safe band: nothing to add
            if hit.severity == Severity::Success {
                continue;
            }
            let mut description = format!(
                "At {} ({}): {}",
                context.name, context.location, hit.description
            );
            if let Some(notes) = &context.notes {
                description.push_str(&format!(
                    " Taking your notes into account ({}), act on this soon.",
                    notes.trim()
                ));
            }
            drafts.push(AdviceDraft {
                category: *category,
                sensor_type: snapshot.sensor_type.clone(),
                severity: hit.severity,
                title: format!("{} at {}", hit.title, context.name),
                description,
                recommended_action: hit.recommended_action.map(str::to_string),
                value: snapshot.value,
                unit: snapshot.unit.clone(),
                observed_at: snapshot.observed_at,
            });
        }
        Ok(drafts)
    }
}

/// Run the advice generator once per farm context.
///
/// Purely additive: the output never removes or alters rule-based
/// suggestions. A failure for one farm is caught locally; that farm
/// contributes zero contextual suggestions and one notice, and every other
/// farm proceeds. The result is only returned once every context has
/// settled.
pub async fn augment_farms<G: AdviceGenerator>(
    contexts: &[FarmContext],
    generator: &G,
) -> (Vec<Suggestion>, Vec<Notice>) {
    let mut suggestions = Vec::new();
    let mut notices = Vec::new();
    let mut augmented = 0usize;
    let mut failed = 0usize;

    for context in contexts {
        let prompt = render_prompt(context);
        match generator.generate(context, &prompt).await {
            Ok(drafts) => {
                augmented += 1;
                for (index, draft) in drafts.into_iter().enumerate() {
                    suggestions.push(draft_to_suggestion(context, draft, index));
                }
            }
            Err(e) => {
                failed += 1;
                warn!(
                    farm_id = %context.farm_id,
                    error = %e,
                    "contextual advice failed, skipping farm"
                );
                notices.push(Notice::advice_failed(&context.name));
            }
        }
    }

    info!(augmented, failed, "contextual augmentation complete");
    (suggestions, notices)
}

fn draft_to_suggestion(context: &FarmContext, draft: AdviceDraft, index: usize) -> Suggestion {
    Suggestion {
        id: suggestion_id(
            "context",
            &[
                &context.farm_id,
                &draft.sensor_type,
                draft.severity.as_str(),
            ],
            index,
        ),
        severity: draft.severity,
        title: draft.title,
        description: draft.description,
        farm_name: context.name.clone(),
        sensor_type: draft.sensor_type,
        value: draft.value,
        unit: draft.unit,
        observed_at: draft.observed_at,
        recommended_action: draft.recommended_action,
        is_contextual: true,
    }
}
