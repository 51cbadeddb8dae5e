//! Fact records
//!
//! A Fact is one discoverable piece of content: a repository, a line from the
//! resume, a profile detail. Facts are immutable once built - gameplay only
//! ever reads them. Collectibles bind one Fact each at spawn time and the
//! reveal effect renders it when the player flies through.
//!
//! Facts come from two origins:
//! - profile facts (GitHub profile fields + the hardcoded resume fallback)
//! - project facts (GitHub repositories)

pub mod fetch;
pub mod resume;

/// Where a fact came from. Drives the reveal color palette: profile and
/// resume facts share one palette, project facts get another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactOrigin {
    /// A repository fetched from the code-hosting profile
    Project,
    /// A profile field fetched from the code-hosting profile
    ProfileInfo,
    /// A hardcoded resume entry (always available, no network needed)
    Resume,
}

/// Closed tag set used only for glyph and accent-color selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactCategory {
    Repo,
    Bio,
    Work,
    Location,
    Link,
    Music,
    Stars,
}

impl FactCategory {
    /// Short ASCII tag prefixed to the reveal text. The default font only
    /// renders printable ASCII, so no emoji here.
    pub fn glyph(&self) -> &'static str {
        match self {
            FactCategory::Repo => "[repo]",
            FactCategory::Bio => "[bio]",
            FactCategory::Work => "[work]",
            FactCategory::Location => "[geo]",
            FactCategory::Link => "[link]",
            FactCategory::Music => "[music]",
            FactCategory::Stars => "[star]",
        }
    }
}

/// Accent color for a fact, by origin with per-category overrides.
fn accent_for(origin: FactOrigin, category: FactCategory) -> [u8; 3] {
    match category {
        FactCategory::Stars => [250, 204, 88],
        FactCategory::Music => [186, 120, 255],
        FactCategory::Location => [120, 235, 170],
        FactCategory::Link => [120, 170, 255],
        _ => match origin {
            FactOrigin::Project => [240, 92, 213],
            FactOrigin::ProfileInfo | FactOrigin::Resume => [64, 222, 236],
        },
    }
}

/// One immutable, display-ready record.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub name: String,
    pub description: Option<String>,
    /// Extra context (for repos: the HTML url)
    pub details: Option<String>,
    pub language: Option<String>,
    pub star_count: Option<u32>,
    pub origin: FactOrigin,
    pub category: FactCategory,
    /// RGB accent, derived from origin + category at construction
    pub accent: [u8; 3],
}

impl Fact {
    pub fn new(name: impl Into<String>, origin: FactOrigin, category: FactCategory) -> Self {
        Self {
            name: name.into(),
            description: None,
            details: None,
            language: None,
            star_count: None,
            origin,
            category,
            accent: accent_for(origin, category),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_stars(mut self, star_count: u32) -> Self {
        self.star_count = Some(star_count);
        self
    }
}

/// The two fact pools the spawn policy draws from.
///
/// Starts with the resume fallback in the profile pool so the game is
/// playable before (or without) the network. A completed fetch appends
/// profile facts and installs the project list. The spawn policy tolerates
/// either pool being empty at any time.
pub struct FactLibrary {
    profile: Vec<Fact>,
    projects: Vec<Fact>,
    syncing: bool,
}

impl FactLibrary {
    /// Library preloaded with the resume fallback, awaiting a fetch.
    pub fn with_resume() -> Self {
        Self {
            profile: resume::resume_facts(),
            projects: Vec::new(),
            syncing: true,
        }
    }

    /// Completely empty library - the "provider has nothing at all" case,
    /// where spawns degrade to silent no-ops. Production always carries the
    /// resume fallback, so only tests construct this.
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            profile: Vec::new(),
            projects: Vec::new(),
            syncing: false,
        }
    }

    /// Install a completed fetch. A failed fetch arrives here as empty
    /// lists, indistinguishable from "nothing published yet".
    pub fn install(&mut self, fetched: fetch::FetchResult) {
        self.profile.extend(fetched.profile);
        self.projects = fetched.projects;
        self.syncing = false;
        println!(
            "facts: {} profile / {} project",
            self.profile.len(),
            self.projects.len()
        );
    }

    pub fn profile(&self) -> &[Fact] {
        &self.profile
    }

    pub fn projects(&self) -> &[Fact] {
        &self.projects
    }

    /// True when neither origin has any facts to offer.
    pub fn is_empty(&self) -> bool {
        self.profile.is_empty() && self.projects.is_empty()
    }

    /// True until the one-shot fetch has completed (either way).
    pub fn syncing(&self) -> bool {
        self.syncing
    }
}
