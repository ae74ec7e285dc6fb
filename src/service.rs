//! The three user-facing operations, independent of HTTP.
//!
//! [`KitchenService`] owns explicitly injected handles for the model, the
//! history store and the output sink. Nothing here is global, so tests swap
//! any collaborator for a stub.
//!
//! ```text
//! suggest_meals ─┐
//!                ├─▶ prompt ──▶ model ──▶ history ──▶ text
//! plan_week ─────┘
//! export_plan ──▶ paginate ──▶ render ──▶ sink ──▶ url
//! ```
//!
//! Generation persists its record *before* returning, so a store outage
//! turns an otherwise successful generation into an error.

use crate::error::KitchenError;
use crate::history::{ChatRecord, HistoryRecord, HistoryStore, PlanRecord};
use crate::pipeline::llm::ModelGateway;
use crate::pipeline::paginate::{paginate, PageGeometry};
use crate::pipeline::render::render_pdf;
use crate::pipeline::sink::OutputSink;
use crate::prompts::{build_meal_prompt, build_planner_prompt};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_USERNAME: &str = "Anonymous";
pub const DEFAULT_PREFERENCE: &str = "vegetarian";
pub const DEFAULT_REGION: &str = "North Indian";

pub const INGREDIENTS_MISSING: &str = "Ingredients missing";
pub const PLAN_MISSING: &str = "Plan data missing";

/// Meal-suggestion, weekly-plan and PDF-export operations.
#[derive(Clone)]
pub struct KitchenService {
    model: Arc<dyn ModelGateway>,
    history: Arc<dyn HistoryStore>,
    sink: Arc<dyn OutputSink>,
    geometry: PageGeometry,
}

impl std::fmt::Debug for KitchenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenService")
            .field("model", &"<dyn ModelGateway>")
            .field("history", &"<dyn HistoryStore>")
            .field("sink", &"<dyn OutputSink>")
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl KitchenService {
    pub fn new(
        model: Arc<dyn ModelGateway>,
        history: Arc<dyn HistoryStore>,
        sink: Arc<dyn OutputSink>,
        geometry: PageGeometry,
    ) -> Self {
        Self {
            model,
            history,
            sink,
            geometry,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Suggest three dishes for `ingredients` and record the exchange.
    ///
    /// # Errors
    /// * [`KitchenError::Validation`] when `ingredients` is empty
    /// * [`KitchenError::Provider`] / [`KitchenError::Storage`] from downstream
    pub async fn suggest_meals(
        &self,
        username: &str,
        ingredients: &str,
    ) -> Result<String, KitchenError> {
        if ingredients.is_empty() {
            return Err(KitchenError::Validation {
                message: INGREDIENTS_MISSING,
            });
        }

        let prompt = build_meal_prompt(ingredients);
        debug!("Meal prompt for '{}': {} chars", username, prompt.len());
        let response = self.model.generate(&prompt).await?;

        let id = self
            .history
            .record(HistoryRecord::Chat(ChatRecord {
                user: username.to_string(),
                ingredients: ingredients.to_string(),
                response: response.clone(),
            }))
            .await?;
        info!("Meal suggestions for '{}' stored as {}", username, id);

        Ok(response)
    }

    /// Generate a Monday-to-Sunday plan and record it.
    pub async fn plan_week(
        &self,
        username: &str,
        preference: &str,
        region: &str,
    ) -> Result<String, KitchenError> {
        let prompt = build_planner_prompt(preference, region);
        debug!(
            "Planner prompt for '{}' ({} / {}): {} chars",
            username,
            preference,
            region,
            prompt.len()
        );
        let plan = self.model.generate(&prompt).await?;

        let id = self
            .history
            .record(HistoryRecord::Plan(PlanRecord {
                user: username.to_string(),
                preference: preference.to_string(),
                region: region.to_string(),
                plan: plan.clone(),
            }))
            .await?;
        info!("Weekly plan for '{}' stored as {}", username, id);

        Ok(plan)
    }

    /// Lay `plan` out on pages, render it to PDF and return the file's URL.
    ///
    /// Every export gets a fresh random file name, so concurrent exports
    /// never write to the same path.
    pub async fn export_plan(&self, plan: &str) -> Result<String, KitchenError> {
        if plan.is_empty() {
            return Err(KitchenError::Validation {
                message: PLAN_MISSING,
            });
        }

        let sequence = paginate(plan, &self.geometry);
        debug!(
            "Paginated {} lines onto {} pages",
            sequence.line_count(),
            sequence.page_count()
        );
        let bytes = render_pdf(sequence).await?;

        let file_name = format!("{}.pdf", Uuid::new_v4());
        let url = self.sink.store(&file_name, bytes).await?;
        info!("Exported plan to {}", url);
        Ok(url)
    }
}
