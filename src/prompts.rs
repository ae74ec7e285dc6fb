//! Prompt templates sent to the generative model.
//!
//! Keeping every template here means a wording change touches exactly one
//! file, and unit tests can inspect the final prompt without a live model.
//! Both builders are pure: the same input always yields the same prompt.

/// Build the meal-suggestion prompt for a free-form ingredient list.
///
/// The list is embedded verbatim; the model is asked for three dishes, each
/// with a tip or variation, as bullet points.
pub fn build_meal_prompt(ingredients: &str) -> String {
    format!(
        "\nSuggest 3 simple and creative Indian meals using these ingredients:\n\
{ingredients}\n\
For each dish, include a short tip or variation.\n\
Use bullet points.\n"
    )
}

/// Build the weekly-plan prompt for a diet preference and regional cuisine.
///
/// Both values appear verbatim, including in the mandatory heading line.
pub fn build_planner_prompt(preference: &str, region: &str) -> String {
    format!(
        r#"
**Create a culturally accurate weekly meal plan for a {preference} diet in {region} cuisine.**
**Keep the Main Heading as Your Weekly Meal Plan By Kitchen Sakhi with {preference} diet name and {region} cuisine**
Format:
- Mention Day (Monday to Sunday)
- For each day, include:
  - Breakfast
  - Lunch
  - Dinner

Each meal should:
- Be based on {region} dishes
- Follow {preference} restrictions
- Include a small variation or tip if possible

Use bullet points and simple formatting.
Do NOT include anything non-Indian.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_prompt_embeds_ingredients_verbatim() {
        let p = build_meal_prompt("paneer, spinach,  garlic ");
        assert!(p.contains("\npaneer, spinach,  garlic \n"));
        assert!(p.contains("Suggest 3 simple and creative Indian meals"));
        assert!(p.contains("Use bullet points."));
    }

    #[test]
    fn planner_prompt_mentions_both_fields_in_heading() {
        let p = build_planner_prompt("vegan", "South Indian");
        assert!(p.contains(
            "Your Weekly Meal Plan By Kitchen Sakhi with vegan diet name and South Indian cuisine"
        ));
        assert!(p.contains("- Be based on South Indian dishes"));
        assert!(p.contains("- Follow vegan restrictions"));
        assert!(p.contains("Monday to Sunday"));
        assert!(p.contains("Do NOT include anything non-Indian."));
    }

    #[test]
    fn planner_prompt_lists_three_meals() {
        let p = build_planner_prompt("vegetarian", "North Indian");
        for meal in ["Breakfast", "Lunch", "Dinner"] {
            assert!(p.contains(&format!("  - {meal}\n")), "missing {meal}");
        }
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(build_meal_prompt("rice"), build_meal_prompt("rice"));
        assert_eq!(
            build_planner_prompt("jain", "Gujarati"),
            build_planner_prompt("jain", "Gujarati")
        );
    }
}
