use crate::llm::{ChatMessage, ChatRequest, ChatRole};
use crate::models::{CandidateProfile, JobContext, Role, Transcript, TranscriptEntry};

/// Scoring instruction appended after any job calibration
pub const SCORING_INSTRUCTIONS: &str = r#"Analyze the following interview transcript.
Return a STRICT JSON object (no markdown, no plain text) with exactly these fields:
- "technical_score": (integer 0-100)
- "communication_score": (integer 0-100)
- "confidence_score": (integer 0-100)
- "feedback": (array of exactly 3 objects, each having: "topic", "feedback", "better_answer")

CRITICAL: Return ONLY valid JSON."#;

/// Base identity of the live interviewer
pub const INTERVIEWER_PERSONA: &str = "You are a professional, polite technical interviewer. Your goal is to assess the candidate. Keep your answers concise (max 2 sentences) to keep the voice conversation natural. Do not be repetitive.";

pub const SCORING_TEMPERATURE: f64 = 0.2;
pub const CHAT_TEMPERATURE: f64 = 0.7;
pub const CHAT_MAX_TOKENS: u32 = 150;

/// Build the scoring system prompt, calibrated to the job when one is given
pub fn build_scoring_system_prompt(job: Option<&JobContext>) -> String {
    let mut prompt = String::from("You are an expert Technical Interviewer. ");

    if let Some(job) = job.filter(|j| !j.is_blank()) {
        if let Some(role) = job.role() {
            prompt.push_str(&format!("You are analyzing an interview for: {}\n", role));
        }
        if !job.job_description.trim().is_empty() {
            prompt.push_str(&format!("Role Requirements: {}\n", job.job_description));
        }
        prompt.push_str(&format!("Difficulty Level: {}\n", job.difficulty));
        prompt.push_str(&format!(
            "Adjust your scoring based on the {} difficulty level.\n",
            job.difficulty
        ));
    }

    prompt.push('\n');
    prompt.push_str(SCORING_INSTRUCTIONS);
    prompt
}

/// Build the full scoring request for a normalized transcript
pub fn build_scoring_request(transcript: &Transcript, job: Option<&JobContext>) -> ChatRequest {
    let user = format!("Here is the transcript:\n\n{}", transcript.render());

    ChatRequest {
        system: build_scoring_system_prompt(job),
        messages: vec![ChatMessage::new(ChatRole::User, user)],
        temperature: SCORING_TEMPERATURE,
        // Uncapped: a truncated reply is unparseable JSON
        max_tokens: None,
        json_mode: true,
    }
}

/// Build the interviewer persona, prefixed by candidate and job context
pub fn build_interviewer_system_prompt(
    candidate: Option<&CandidateProfile>,
    job: Option<&JobContext>,
) -> String {
    let mut prompt = String::new();

    if let Some(candidate) = candidate {
        let skills = if candidate.technical_skills.is_empty() {
            "Not specified".to_string()
        } else {
            candidate.technical_skills.join(", ")
        };
        let focus = candidate
            .most_impressive_project
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or("their experience");
        prompt.push_str(&format!(
            "The candidate is {}. Skills: {}. Focus questions on: {}. ",
            candidate.full_name, skills, focus
        ));
    }

    if let Some(job) = job.filter(|j| !j.is_blank()) {
        if let Some(role) = job.role() {
            prompt.push_str(&format!("You are interviewing for the role: {}.\n", role));
        }
        prompt.push_str(&format!(
            "Job Requirements: {}\nDifficulty Level: {}\n",
            job.job_description, job.difficulty
        ));
        prompt.push_str(&format!(
            "Adjust your questions and expectations based on this {} difficulty level. ",
            job.difficulty
        ));
    }

    prompt.push_str(INTERVIEWER_PERSONA);
    prompt
}

/// Build the request for the interviewer's next turn
pub fn build_chat_request(
    message: &str,
    history: &[TranscriptEntry],
    candidate: Option<&CandidateProfile>,
    job: Option<&JobContext>,
) -> ChatRequest {
    let mut messages: Vec<ChatMessage> = history
        .iter()
        .map(|entry| {
            let role = match entry.role {
                Role::Candidate => ChatRole::User,
                Role::Interviewer => ChatRole::Assistant,
            };
            ChatMessage::new(role, entry.content.clone())
        })
        .collect();
    messages.push(ChatMessage::new(ChatRole::User, message));

    ChatRequest {
        system: build_interviewer_system_prompt(candidate, job),
        messages,
        temperature: CHAT_TEMPERATURE,
        max_tokens: Some(CHAT_MAX_TOKENS),
        json_mode: false,
    }
}
