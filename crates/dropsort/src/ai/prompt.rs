//! Prompt construction for the classification, summary and report requests.

/// Labels offered to the classifier. Any other label is still accepted.
pub const CATEGORIES: &[&str] = &[
    "Identity",
    "Bank",
    "Education",
    "Medical",
    "Receipts",
    "Bills",
    "Travel",
    "Work",
    "Personal",
    "Photos",
    "Screenshots",
    "Software",
    "Videos",
    "Music",
    "Archives",
    "Random",
];

/// Escapes chat-template control sequences so file content cannot inject
/// role markers into a prompt.
pub fn sanitize_for_prompt(text: &str) -> String {
    text.replace("<|", "< |")
        .replace("|>", "| >")
        .replace("<s>", "< s >")
        .replace("</s>", "< / s >")
        .replace("[INST]", "[ INST ]")
        .replace("[/INST]", "[ / INST ]")
        .replace("<<SYS>>", "< < SYS > >")
        .replace("<</SYS>>", "< < / SYS > >")
}

pub fn classification_prompt(filename: &str, extension: &str, preview: &str) -> String {
    format!(
        r#"You are a file organizer.

You classify and rename files so a person's downloads stay tidy.

FILENAME: {filename}
EXTENSION: {extension}

TEXT PREVIEW (may be empty):
{preview}

Return JSON ONLY.

Format:
{{
  "category": "{categories}",
  "suggested_name": "short safe filename without extension",
  "reason": "short reason"
}}

Rules:
- suggested_name must be short and meaningful
- no special characters like : * ? < > |
- If unsure, choose Random.
"#,
        filename = sanitize_for_prompt(filename),
        extension = sanitize_for_prompt(extension),
        preview = sanitize_for_prompt(preview),
        categories = CATEGORIES.join("|"),
    )
}

pub fn summary_prompt(filename: &str, preview: &str) -> String {
    format!(
        r#"Summarize this document in a simple, human-friendly way.
Write at most 5 bullet points.

DOCUMENT NAME: {filename}
TEXT:
{preview}

Output format:
SUMMARY:
- point
- point
"#,
        filename = sanitize_for_prompt(filename),
        preview = sanitize_for_prompt(preview),
    )
}

/// `records_json` is the pretty-printed batch of today's records.
pub fn daily_report_prompt(records_json: &str) -> String {
    format!(
        r#"Create a daily report of what the user downloaded and organized today.
Be short, clean and useful.

DATA:
{data}

Output format:
DAILY REPORT:
- ...
"#,
        data = sanitize_for_prompt(records_json),
    )
}
