//! Prompt construction for code analysis.
//!
//! The rendered prompt is a pure function of `(code, language, preference)`.

use crate::preference::Preference;

/// System instruction sent ahead of every analysis prompt.
pub const SYSTEM_PROMPT: &str = "You are a senior software engineer expert in code analysis \
and debugging. Always return valid JSON in the exact format specified.";

/// JSON shape the model must reply with.
const RESPONSE_SHAPE: &str = r#"{
  "errors": [
    {
      "line": <line_number>,
      "type": "bug|spelling|warning",
      "message": "<error_description>",
      "suggestion": "<optional_suggestion>"
    }
  ],
  "improvedCode": "<complete_improved_code>",
  "explanation": "<detailed_explanation>"
}"#;

/// Render the user prompt asking the model to analyze `code`.
pub fn build_prompt(code: &str, language: &str, preference: Preference) -> String {
    format!(
        "Analyze the following {language} code.\n\
         \n\
         Tasks:\n\
         1. Find syntax and logical bugs\n\
         2. Find spelling mistakes in variable names, comments, and strings\n\
         3. Improve code based on preference: {name}\n   - {description}\n\
         4. Provide improved code\n\
         \n\
         Return JSON with this exact structure:\n\
         {RESPONSE_SHAPE}\n\
         \n\
         Code:\n\
         {code}",
        name = preference.as_str(),
        description = preference.description(),
    )
}
