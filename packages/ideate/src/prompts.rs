// ABOUTME: Prompt text for one-shot PRD generation
// ABOUTME: Fixed product-manager policy used as the system prompt plus the raw-idea user prompt

/// Policy the model is held to for every document.
pub const SYSTEM_PROMPT: &str = "\
You are an elite Senior Product Manager and Software Architect.
Your goal is to take a messy, unstructured app idea and transform it into a rigorous, \
professional Product Requirements Document (PRD) optimized for building with AI IDEs.

STRICT RULES:
1. Focus on modern, scalable tech stacks (React, TypeScript, Tailwind, Supabase/Firebase, Node.js/Next.js).
2. The \"cursorPrompt\" must be EXTREMELY detailed. It should tell Cursor exactly which files to \
create, what libraries to use, and how to structure the project. It should be a one-shot prompt.
3. The \"replitPrompt\" should be conversational and step-by-step for an agent.
4. Be realistic about MVP scope. Don't overengineer the \"Must Haves\".
5. The Data Models should be relational and logical. Attributes use the form \"name: type\".
6. Feature priority is exactly one of High, Medium, or Low.
7. Fill in every field. Do not add fields that are not in the schema.";

/// Get system prompt for PRD generation
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}

/// Build the user prompt for a raw idea
pub fn idea_prompt(idea: &str) -> String {
    format!("Here is the raw idea: {}", idea)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idea_prompt_embeds_idea_verbatim() {
        assert_eq!(
            idea_prompt("a todo app\nwith teams"),
            "Here is the raw idea: a todo app\nwith teams"
        );
    }

    #[test]
    fn test_system_prompt_names_both_ide_prompts() {
        assert!(system_prompt().contains("cursorPrompt"));
        assert!(system_prompt().contains("replitPrompt"));
    }
}
