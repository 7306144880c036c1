//! Agent selection: pick one dispatchable agent for a classified intent.

use crate::domain::Agent;
use crate::intent::Intent;

/// First-match-wins selection over agents ordered by creation time:
///
/// - no agents: `None`
/// - exactly one agent: that agent, whatever the intent
/// - general intent: the first agent
/// - otherwise the first agent whose persona kind contains the intent
///   string (`content` matches `content-writer`), falling back to the
///   first agent when nothing matches
pub fn select_agent<'a>(agents: &'a [Agent], intent: Intent) -> Option<&'a Agent> {
    let first = agents.first()?;
    if agents.len() == 1 || intent == Intent::General {
        return Some(first);
    }

    let wanted = intent.as_str();
    agents
        .iter()
        .find(|agent| agent.persona.kind_str().contains(wanted))
        .or(Some(first))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::select_agent;
    use crate::domain::{Agent, AgentPersona, UserId};
    use crate::intent::Intent;

    fn agent(name: &str, persona: AgentPersona) -> Agent {
        Agent::new(UserId("owner".to_owned()), name, persona, Utc::now())
    }

    fn writer() -> Agent {
        agent("writer", AgentPersona::ContentWriter { focus_topics: vec![] })
    }

    fn seo() -> Agent {
        agent("seo", AgentPersona::SeoSpecialist { focus_topics: vec![] })
    }

    fn support() -> Agent {
        agent("support", AgentPersona::CustomerSupport { focus_topics: vec![] })
    }

    #[test]
    fn no_agents_selects_none() {
        assert!(select_agent(&[], Intent::Content).is_none());
    }

    #[test]
    fn single_agent_wins_regardless_of_intent() {
        let agents = vec![seo()];
        let selected = select_agent(&agents, Intent::Content).unwrap();
        assert_eq!(selected.name, "seo");
    }

    #[test]
    fn intent_matches_persona_kind() {
        let agents = vec![writer(), seo(), support()];
        assert_eq!(select_agent(&agents, Intent::Seo).unwrap().name, "seo");
        assert_eq!(select_agent(&agents, Intent::Support).unwrap().name, "support");
        assert_eq!(select_agent(&agents, Intent::Content).unwrap().name, "writer");
    }

    #[test]
    fn general_intent_takes_first_agent() {
        let agents = vec![seo(), writer()];
        assert_eq!(select_agent(&agents, Intent::General).unwrap().name, "seo");
    }

    #[test]
    fn unmatched_intent_falls_back_to_first_agent() {
        let agents = vec![seo(), support()];
        assert_eq!(select_agent(&agents, Intent::Analytics).unwrap().name, "seo");
    }

    #[test]
    fn first_match_wins_between_equal_personas() {
        let mut first = writer();
        first.name = "older".to_owned();
        let mut second = writer();
        second.name = "newer".to_owned();
        let agents = vec![first, second];
        assert_eq!(select_agent(&agents, Intent::Content).unwrap().name, "older");
    }
}
