//! Hardcoded resume facts - the offline fallback for the profile pool.
//!
//! These are always loaded at startup so the lane has something to offer
//! before the GitHub fetch lands (or when it never does).

use super::{Fact, FactCategory, FactOrigin};

/// The fixed local fact list.
pub fn resume_facts() -> Vec<Fact> {
    vec![
        Fact::new("Software engineer by trade", FactOrigin::Resume, FactCategory::Bio)
            .with_description("ships Rust to native and browser from one codebase"),
        Fact::new("Bonnie Engine", FactOrigin::Resume, FactCategory::Repo)
            .with_description("a PS1-era game engine built from scratch, software rasterizer included")
            .with_language("Rust"),
        Fact::new("Former metal guitarist", FactOrigin::Resume, FactCategory::Music)
            .with_description("garage demos recorded under the Bonnie Studios banner"),
        Fact::new("Tracker composer", FactOrigin::Resume, FactCategory::Music)
            .with_description("pattern-based chiptunes, eight channels, classic arpeggio effects"),
        Fact::new("World-builder", FactOrigin::Resume, FactCategory::Work)
            .with_description("sector-based level tools in the spirit of the classic TR editor"),
        Fact::new("Open source believer", FactOrigin::Resume, FactCategory::Bio)
            .with_description("everything shipped here can be cloned and built for free"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_nonempty_and_resume_origin() {
        let facts = resume_facts();
        assert!(!facts.is_empty());
        assert!(facts.iter().all(|f| f.origin == FactOrigin::Resume));
    }

    #[test]
    fn test_fallback_names_are_distinct() {
        let facts = resume_facts();
        for (i, a) in facts.iter().enumerate() {
            for b in &facts[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
