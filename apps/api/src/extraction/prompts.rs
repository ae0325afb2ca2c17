// Extraction prompt template.
// The JSON shape lists every FieldKey in canonical order, each as a short string.

/// Shown when neither an uploaded file nor pasted notes were supplied.
pub const INPUT_MISSING_MESSAGE: &str = "Please upload or paste some content.";

/// Shown when the model's reply is not valid JSON.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse GPT response as JSON.";

/// Shown after a successful merge.
pub const EXTRACTION_SUCCESS_MESSAGE: &str = "Fields auto-filled! Scroll down to review and edit.";

/// Extraction prompt template. Replace `{input_text}` before sending.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You're an assistant extracting information from notes for a POC document.

Input:
{input_text}

Output the following as a JSON object:
{
    "customer_name": "...",
    "industry": "...",
    "company_background": "...",
    "key_business_services": "...",
    "current_challenges": "...",
    "decision_criteria": "...",
    "tech_stack": "...",
    "desired_outcomes": "...",
    "scope_of_architecture": "...",
    "timeline": "...",
    "key_contacts": "..."
}"#;

/// Builds the extraction prompt, embedding the notes verbatim.
pub fn build_extraction_prompt(input_text: &str) -> String {
    EXTRACTION_PROMPT_TEMPLATE.replace("{input_text}", input_text)
}
