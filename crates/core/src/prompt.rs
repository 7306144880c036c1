//! Canned system prompts per persona. The user message is never baked
//! into the prompt; it travels separately as the user-role message.

use crate::domain::AgentPersona;

const CONTENT_WRITER_PROMPT: &str = "You are a professional content writer agent. Create engaging, well-structured content based on user requests. Focus on clarity, SEO best practices, and compelling storytelling.";
const SEO_SPECIALIST_PROMPT: &str = "You are an SEO specialist agent. Help with keyword research, on-page optimization, backlink strategies, and improving search rankings. Provide data-driven recommendations.";
const MARKETING_PROMPT: &str = "You are a marketing expert agent. Create compelling ad copy, email sequences, landing page content, and marketing strategies. Focus on conversion and brand alignment.";
const CUSTOMER_SUPPORT_PROMPT: &str = "You are a customer support agent. Respond to inquiries helpfully, FAQ questions, and route tickets when needed. Be polite, patient, and accurate.";
const DATA_ANALYST_PROMPT: &str = "You are a data analyst agent. Help query data, generate reports, and create visualizations. Provide insights and actionable recommendations based on data.";
const CUSTOM_FALLBACK_PROMPT: &str = "You are a custom AI agent. Follow the user's specific instructions and configuration. Adapt to their needs.";

pub fn system_prompt(persona: &AgentPersona) -> String {
    let base = match persona {
        AgentPersona::ContentWriter { .. } => CONTENT_WRITER_PROMPT,
        AgentPersona::SeoSpecialist { .. } => SEO_SPECIALIST_PROMPT,
        AgentPersona::Marketing { .. } => MARKETING_PROMPT,
        AgentPersona::CustomerSupport { .. } => CUSTOMER_SUPPORT_PROMPT,
        AgentPersona::DataAnalyst { .. } => DATA_ANALYST_PROMPT,
        AgentPersona::Custom { instructions, .. } => {
            if instructions.trim().is_empty() {
                CUSTOM_FALLBACK_PROMPT
            } else {
                instructions.as_str()
            }
        }
    };

    let topics = persona.focus_topics();
    if topics.is_empty() {
        base.to_owned()
    } else {
        format!("{base}\n\nFocus topics: {}", topics.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::system_prompt;
    use crate::domain::AgentPersona;

    #[test]
    fn canned_prompt_per_persona() {
        let prompt = system_prompt(&AgentPersona::ContentWriter { focus_topics: vec![] });
        assert!(prompt.starts_with("You are a professional content writer agent."));

        let prompt = system_prompt(&AgentPersona::DataAnalyst { focus_topics: vec![] });
        assert!(prompt.starts_with("You are a data analyst agent."));
    }

    #[test]
    fn focus_topics_append_a_suffix() {
        let prompt = system_prompt(&AgentPersona::SeoSpecialist {
            focus_topics: vec!["b2b saas".to_owned(), "pricing pages".to_owned()],
        });
        assert!(prompt.ends_with("\n\nFocus topics: b2b saas, pricing pages"));
    }

    #[test]
    fn custom_uses_instructions_verbatim() {
        let prompt = system_prompt(&AgentPersona::Custom {
            instructions: "Answer only in haiku.".to_owned(),
            focus_topics: vec![],
        });
        assert_eq!(prompt, "Answer only in haiku.");
    }

    #[test]
    fn empty_custom_instructions_fall_back() {
        let prompt = system_prompt(&AgentPersona::Custom {
            instructions: "   ".to_owned(),
            focus_topics: vec![],
        });
        assert!(prompt.starts_with("You are a custom AI agent."));
    }
}
