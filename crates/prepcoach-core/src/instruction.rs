//! System instruction builder.
//!
//! Composes the system-level turn sent to the completion provider.  Clause
//! order is fixed: coach framing, brevity constraint, difficulty adaptation,
//! then the optional job-description and role-play persona clauses.

use crate::prompt::Technique;
use crate::types::{Difficulty, InterviewType};

/// Build the system instruction for one coaching exchange.
///
/// The persona clause is emitted only when `technique` is
/// [`Technique::RolePlay`] *and* a non-empty persona was supplied, so a stale
/// persona string can never leak into other techniques.  Empty optional
/// inputs leave no residual text behind.
pub fn build_instruction(
    interview_type: InterviewType,
    difficulty: Difficulty,
    technique: Technique,
    job_description: Option<&str>,
    persona: Option<&str>,
) -> String {
    let mut instruction = format!(
        "You are an expert interview coach specializing in {interview_type} interviews. \
         Answer the user's question in 2-3 sentences, directly and concisely, without any \
         introductory or clarifying paragraphs. Be brief. Adjust the complexity of your \
         answer to match a {difficulty} level."
    );

    if let Some(jd) = job_description.filter(|jd| !jd.is_empty()) {
        instruction.push_str(&format!(" The job description is: {jd}"));
    }

    if technique == Technique::RolePlay {
        if let Some(persona) = persona.filter(|p| !p.is_empty()) {
            instruction.push_str(&format!(" Answer as if you are {persona}."));
        }
    }

    instruction.push_str(
        " Do not include phrases like 'Certainly', 'When facing', or any preamble. \
         Only provide the answer itself.",
    );

    instruction
}

// ── Tests ──────────────────────────────────────────────────────────────────────
