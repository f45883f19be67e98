//! Prompt compiler — builds the classification instruction from the taxonomy
//! registry and the user's quiz input.

use crate::taxonomy::TagCategory;

/// Reference phrase for recognizing the gender question. The check is a
/// case-insensitive containment heuristic, not an intent classifier; any
/// question mentioning gender routes to the gender flow.
const GENDER_REFERENCE_QUESTION: &str = "gender";

/// A compiled classification prompt plus the flow it was compiled for.
/// `gender_flow` decides whether the validator expects a `gender` field.
#[derive(Debug, Clone)]
pub struct CompiledPrompt {
    pub text: String,
    pub gender_flow: bool,
}

/// Pure function of `question` alone: does this request use the gender flow?
pub fn is_gender_question(question: &str) -> bool {
    question.to_lowercase().contains(GENDER_REFERENCE_QUESTION)
}

/// Compiles the instruction string sent to the completion provider.
///
/// The full taxonomy (allowed values and selection bounds) is embedded
/// verbatim so the provider cannot invent out-of-taxonomy values, and the
/// required raw-JSON output shape includes `gender` only in the gender flow.
/// Question and answer are appended as clearly delimited, untrusted content.
pub fn compile_prompt(question: Option<&str>, answer: &str) -> CompiledPrompt {
    let gender_flow = question.is_some_and(is_gender_question);

    let mut text = String::from(
        "You are a fashion quiz tagger.\n\n\
         Based on the user's single free-text answer to a style quiz question, \
         return the most appropriate tags from the following predefined tag lists:\n",
    );

    for category in TagCategory::LIST_CATEGORIES {
        push_category_section(&mut text, category);
    }
    if gender_flow {
        push_category_section(&mut text, TagCategory::Gender);
    }

    text.push_str(
        "\nReturn only the JSON output (no code blocks, no explanations). \
         Do not wrap it in markdown or backticks.\n\n",
    );
    text.push_str(if gender_flow {
        "{\n  \"style_tags\": [...],\n  \"fitting_tags\": [...],\n  \"activity_tags\": [...],\n  \"gender\": \"...\"\n}\n"
    } else {
        "{\n  \"style_tags\": [...],\n  \"fitting_tags\": [...],\n  \"activity_tags\": [...]\n}\n"
    });

    if let Some(question) = question {
        text.push_str(&format!("\nHere's the quiz question:\n\"{question}\"\n"));
    }
    text.push_str(&format!("\nHere's the user's answer:\n\"{answer}\"\n"));

    CompiledPrompt { text, gender_flow }
}

fn push_category_section(text: &mut String, category: TagCategory) {
    let bounds = if category == TagCategory::Gender {
        "choose exactly 1".to_string()
    } else {
        format!("choose {}\u{2013}{} max", category.min(), category.max())
    };
    text.push_str(&format!("\n{} ({}):\n", category.label(), bounds));
    for value in category.allowed() {
        text.push_str(&format!("- {value}\n"));
    }
}
