//! System prompt construction
//!
//! Renders the loaded [`AgentProfile`] into the system prompt the agent
//! runs under. The prompt shape is fixed; only the persona header, goals,
//! and budget line vary per session.

use crate::config::AgentProfile;
use std::fmt::Write;

/// Fixed per-cycle instruction sent after the conversation history
pub const TRIGGERING_PROMPT: &str =
    "Determine which next command to use, and respond using the format specified above:";

/// Build the full system prompt for a profile
pub fn build_system_prompt(profile: &AgentProfile) -> String {
    let mut prompt = format!(
        "You are {}, {}.\n\
         Your decisions must always be made independently without seeking \
         user assistance. Play to your strengths as an LLM and pursue \
         simple strategies with no legal complications.\n",
        profile.ai_name, profile.ai_role
    );

    if profile.api_budget > 0.0 {
        let _ = write!(
            prompt,
            "It takes money to let you run. Your API budget is ${:.3}.\n",
            profile.api_budget
        );
    }

    prompt.push_str("\nGOALS:\n\n");
    for (i, goal) in profile.ai_goals.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, goal);
    }

    prompt.push_str(
        "\nConstraints:\n\
         1. Immediately save important information to memory; your short \
         term memory is limited.\n\
         2. If you are unsure how you previously did something or want to \
         recall past events, thinking about similar events will help you \
         remember.\n\
         3. Exclusively use the commands listed to you.\n\
         \n\
         Performance Evaluation:\n\
         1. Continuously review and analyze your actions to ensure you are \
         performing to the best of your abilities.\n\
         2. Constructively self-criticize your big-picture behavior \
         constantly.\n\
         3. Every command has a cost, so be smart and efficient.\n\
         \n\
         You should only respond in JSON format as described below.\n\
         Response Format:\n\
         {\n\
         \x20   \"thoughts\": {\n\
         \x20       \"text\": \"thought\",\n\
         \x20       \"reasoning\": \"reasoning\",\n\
         \x20       \"plan\": \"- short bulleted\\n- list that conveys\\n- long-term plan\",\n\
         \x20       \"criticism\": \"constructive self-criticism\"\n\
         \x20   },\n\
         \x20   \"command\": {\"name\": \"command name\", \"args\": {\"arg name\": \"value\"}}\n\
         }\n\
         Ensure the response can be parsed by a standard JSON parser.",
    );

    prompt
}
