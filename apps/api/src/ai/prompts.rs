// Prompt factory for the text-improvement and scoring endpoints.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::Value;

use crate::enrichment::EnrichmentKind;
use crate::llm_client::prompts::{EDITOR_RULES, JSON_ONLY_INSTRUCTION};

pub const IMPROVE_TEMPERATURE: f32 = 0.3;
pub const ATS_TEMPERATURE: f32 = 0.2;

const SUMMARY_PROMPT: &str = "\
You are a professional resume writer.

Rules:
- Do NOT list or mention specific skills or technologies
- Do NOT include comma-separated tools or languages
- Do NOT invent experience, tools, companies, or metrics
- Do NOT exaggerate role or seniority
- You MAY add professional context, career focus, and learning intent
- Preserve all factual details from the user
- Keep it ATS-friendly, concise, and professional
- 4-6 lines maximum
- Output ONLY the final rewritten summary text

User summary:
{about}

Skills (context only, do not list them):
{skills}";

const SKILLS_PROMPT: &str = "\
You are a professional resume editor.

Rules:
- Organize ONLY the skills explicitly provided in the input into categories
- Do NOT add, infer, or invent any skills
- Do NOT create empty categories or categories with no skills
- Do NOT add any note or explanation
- Ignore soft skills, hobbies, or personal traits
- Do NOT repeat skills across categories
- Classify conservatively and accurately
- Capitalize the first letter of each skill

Classification guidance:
- Programming Languages: C, C++, Java, Python, JavaScript, etc.
- Frontend: HTML, CSS, JavaScript, React, etc.
- Backend: Node.js, PHP, Django, etc.
- Databases: MySQL, PostgreSQL, MongoDB, etc.
- Tools: Git, Docker, Postman, etc.
- Cloud/DevOps: AWS, Azure, CI/CD, etc.

Strict output format, one category per line (ONLY relevant categories):
Category Name: skill1, skill2

Input skills:
{skills}";

const PROJECT_PROMPT: &str = "\
Rewrite the following project description into a strong, resume-ready 2-3 concise lines.

STRICT RULES:
- Improve clarity and impact only
- Do NOT add new technologies or features
- Do NOT exaggerate or invent results
- Avoid vague phrases (e.g., \"worked on\", \"helped\", \"learned\")
- Focus on what was built, how it was built, or what problem it solved
- Do NOT mention the project name
- Output ONLY the rewritten description text

Text:
{description}";

const EXPERIENCE_PROMPT: &str = "\
Rewrite the following work experience description into clear, resume-ready language
in 2-3 concise lines.

STRICT RULES:
- Improve wording and structure only
- Do NOT add new responsibilities, tools, or achievements
- Do NOT invent metrics, impact, or leadership claims
- Avoid vague phrases (e.g., \"worked on\", \"was responsible for\")
- Do NOT add job title, company name, or duration
- Output ONLY the rewritten description text

Text:
{description}";

const ACHIEVEMENT_PROMPT: &str = "\
Rewrite the following achievement into ONE clear, resume-ready line.

STRICT RULES:
- Improve clarity and professionalism only
- Do NOT add rankings, numbers, scale, or impact unless explicitly mentioned
- Do NOT invent competition size, metrics, or recognition level
- Use strong but honest action verbs
- Output ONLY the final rewritten line

Achievement Title:
{title}

Achievement Description:
{description}";

const ATS_PROMPT: &str = "\
You are an ATS resume evaluator.

Analyze the resume against the job role: \"{job_role}\"

Return STRICT JSON ONLY in this format:
{
  \"ats_score\": number (0-100),
  \"suggestions\": [
    {
      \"title\": \"Short improvement title\",
      \"detail\": \"Clear actionable improvement suggestion\"
    }
  ]
}

{json_only}

Resume:
{resume_text}";

/// String field of the payload, or "" when absent or not a string.
fn text<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn build_improve_prompt(kind: EnrichmentKind, payload: &Value) -> String {
    match kind {
        EnrichmentKind::Summary => SUMMARY_PROMPT
            .replace("{skills}", text(payload, "skills"))
            .replace("{about}", text(payload, "about")),
        EnrichmentKind::Skills => SKILLS_PROMPT.replace("{skills}", text(payload, "skills")),
        EnrichmentKind::Project => format!(
            "{EDITOR_RULES}\n\n{}",
            PROJECT_PROMPT.replace("{description}", text(payload, "description"))
        ),
        EnrichmentKind::Experience => format!(
            "{EDITOR_RULES}\n\n{}",
            EXPERIENCE_PROMPT.replace("{description}", text(payload, "description"))
        ),
        EnrichmentKind::Achievement => format!(
            "{EDITOR_RULES}\n\n{}",
            ACHIEVEMENT_PROMPT
                .replace("{description}", text(payload, "description"))
                .replace("{title}", text(payload, "title"))
        ),
    }
}

pub fn build_ats_prompt(job_role: &str, resume_text: &str) -> String {
    ATS_PROMPT
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{job_role}", job_role)
        .replace("{resume_text}", resume_text)
}
