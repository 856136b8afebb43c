//! Prompt template registry.
//!
//! Each [`Technique`] wraps the raw question in fixed instructional
//! scaffolding before it is sent upstream as the user turn.  The set of
//! techniques is closed; parsing an unknown identifier fails, and
//! [`Technique::render`] matches exhaustively so adding a technique is a
//! compile-time-checked extension point.

use serde::{Deserialize, Serialize};

/// Prompt-engineering technique selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Technique {
    ZeroShot,
    FewShot,
    ChainOfThought,
    RolePlay,
    StepByStep,
}

impl Technique {
    pub const ALL: [Technique; 5] = [
        Technique::ZeroShot,
        Technique::FewShot,
        Technique::ChainOfThought,
        Technique::RolePlay,
        Technique::StepByStep,
    ];

    /// Human-readable name for selection UIs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Technique::ZeroShot => "Zero-Shot Prompting",
            Technique::FewShot => "Few-Shot Learning",
            Technique::ChainOfThought => "Chain of Thought",
            Technique::RolePlay => "Role-Playing",
            Technique::StepByStep => "Step-by-Step Analysis",
        }
    }

    /// Produce the fully-formed user-turn prompt for `question`.
    ///
    /// Deterministic and side-effect free; the question always appears
    /// verbatim in the output.
    pub fn render(&self, question: &str) -> String {
        match self {
            Technique::ZeroShot => format!(
                "Please provide a detailed response to this interview question: {question}"
            ),
            Technique::FewShot => format!(
                "Here are some example interview questions and answers:\n\
                 Q: \"Tell me about a time you faced a challenge at work.\"\n\
                 A: \"I faced a challenge when our team had to deliver a project under a tight deadline...\"\n\
                 \n\
                 Q: \"How do you handle conflicts in a team?\"\n\
                 A: \"I believe in addressing conflicts directly and professionally...\"\n\
                 \n\
                 Now, please answer this interview question: {question}"
            ),
            Technique::ChainOfThought => format!(
                "Let's think through this interview question step by step:\n\
                 1. What is the interviewer really asking?\n\
                 2. What key points should I address?\n\
                 3. What examples can I use?\n\
                 4. How can I structure my response?\n\
                 \n\
                 Question: {question}"
            ),
            Technique::RolePlay => format!(
                "You are an experienced interviewer. Please provide a comprehensive response \
                 to this question as if you were the candidate: {question}"
            ),
            Technique::StepByStep => format!(
                "Please analyze this interview question and provide a structured response:\n\
                 1. Understanding the question\n\
                 2. Key points to address\n\
                 3. Relevant examples\n\
                 4. Conclusion\n\
                 \n\
                 Question: {question}"
            ),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_template_contains_the_question_verbatim() {
        let question = "Why do manhole covers exist?";
        for technique in Technique::ALL {
            let prompt = technique.render(question);
            assert!(
                prompt.contains(question),
                "{technique} template lost the question: {prompt}"
            );
        }
    }

    #[test]
    fn unknown_identifier_fails_to_parse() {
        assert!("one-shot".parse::<Technique>().is_err());
        assert!("".parse::<Technique>().is_err());
    }

    #[test]
    fn identifiers_round_trip() {
        for technique in Technique::ALL {
            let parsed: Technique = technique.to_string().parse().unwrap();
            assert_eq!(parsed, technique);
        }
        assert_eq!("chain-of-thought".parse::<Technique>().unwrap(), Technique::ChainOfThought);
    }

    #[test]
    fn few_shot_prepends_worked_examples() {
        let prompt = Technique::FewShot.render("q");
        assert!(prompt.contains("example interview questions and answers"));
        assert!(prompt.contains("Q: \"How do you handle conflicts in a team?\""));
    }

    #[test]
    fn chain_of_thought_lists_analytical_steps() {
        let prompt = Technique::ChainOfThought.render("q");
        assert!(prompt.contains("1. What is the interviewer really asking?"));
        assert!(prompt.ends_with("Question: q"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(Technique::ZeroShot.render("x"), Technique::ZeroShot.render("x"));
    }
}
