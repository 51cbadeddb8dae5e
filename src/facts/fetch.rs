//! One-shot profile fetch
//!
//! Pulls profile fields and public repositories from the GitHub REST API on
//! a background thread, using the same fire-and-poll pattern as the rest of
//! the codebase: kick off the request, poll the handle once per frame.
//!
//! Contract: any failure - network down, HTTP error, unparseable payload -
//! resolves to empty lists. "Fetch failed" and "no data yet" are
//! deliberately indistinguishable to the caller; the spawn policy treats
//! both as "nothing to offer from that origin".

use super::Fact;

/// The completed fetch: profile-origin facts and project-origin facts.
/// Either list (or both) may be empty.
#[derive(Debug, Default)]
pub struct FetchResult {
    pub profile: Vec<Fact>,
    pub projects: Vec<Fact>,
}

// =============================================================================
// Native: background thread + mpsc channel
// =============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::super::{Fact, FactCategory, FactOrigin};
    use super::FetchResult;
    use std::sync::mpsc::{channel, Receiver, TryRecvError};
    use std::thread;

    const API_ROOT: &str = "https://api.github.com";
    /// GitHub rejects requests without a User-Agent.
    const USER_AGENT: &str = "synthlane-portfolio";
    /// A portfolio page doesn't need the full repo list
    const REPO_PAGE_SIZE: usize = 30;

    /// Handle to the in-flight fetch. Poll once per frame.
    pub struct PendingFacts {
        receiver: Option<Receiver<FetchResult>>,
    }

    impl PendingFacts {
        /// Returns the result exactly once; `None` while still in flight
        /// and on every poll after the result was taken.
        pub fn poll(&mut self) -> Option<FetchResult> {
            let receiver = self.receiver.as_ref()?;
            match receiver.try_recv() {
                Ok(result) => {
                    self.receiver = None;
                    Some(result)
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    // Thread panicked; degrade to the empty result
                    eprintln!("fact fetch thread died, continuing without remote facts");
                    self.receiver = None;
                    Some(FetchResult::default())
                }
            }
        }
    }

    /// Start the one-shot fetch for a GitHub login.
    pub fn fetch_facts(login: &str) -> PendingFacts {
        let (sender, receiver) = channel();
        let login = login.to_string();

        thread::spawn(move || {
            let _ = sender.send(fetch_sync(&login));
        });

        PendingFacts {
            receiver: Some(receiver),
        }
    }

    fn fetch_sync(login: &str) -> FetchResult {
        let profile = match get_json(&format!("{}/users/{}", API_ROOT, login)) {
            Ok(json) => map_profile_json(&json),
            Err(e) => {
                eprintln!("profile fetch: {}", e);
                Vec::new()
            }
        };

        let repo_url = format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            API_ROOT, login, REPO_PAGE_SIZE
        );
        let projects = match get_json(&repo_url) {
            Ok(serde_json::Value::Array(repos)) => {
                repos.iter().filter_map(map_repo_json).collect()
            }
            Ok(_) => {
                eprintln!("repo fetch: unexpected payload shape");
                Vec::new()
            }
            Err(e) => {
                eprintln!("repo fetch: {}", e);
                Vec::new()
            }
        };

        FetchResult { profile, projects }
    }

    fn get_json(url: &str) -> Result<serde_json::Value, String> {
        let response = ureq::get(url)
            .set("User-Agent", USER_AGENT)
            .set("Accept", "application/vnd.github+json")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => format!("GitHub returned {} for {}", code, url),
                other => format!("request to {} failed: {}", url, other),
            })?;

        response
            .into_json()
            .map_err(|e| format!("bad JSON from {}: {}", url, e))
    }

    /// Map the `/users/{login}` payload to profile facts. Missing fields
    /// are skipped, never errors - a sparse profile is a short fact list.
    pub(super) fn map_profile_json(json: &serde_json::Value) -> Vec<Fact> {
        let mut facts = Vec::new();

        let login = json["login"].as_str().unwrap_or("profile");
        let display = json["name"].as_str().unwrap_or(login);
        let mut headline = Fact::new(display, FactOrigin::ProfileInfo, FactCategory::Bio);
        if let Some(bio) = json["bio"].as_str() {
            headline = headline.with_description(bio);
        }
        facts.push(headline);

        if let Some(company) = json["company"].as_str() {
            facts.push(Fact::new(company, FactOrigin::ProfileInfo, FactCategory::Work));
        }
        if let Some(location) = json["location"].as_str() {
            facts.push(Fact::new(location, FactOrigin::ProfileInfo, FactCategory::Location));
        }
        if let Some(blog) = json["blog"].as_str().filter(|s| !s.is_empty()) {
            facts.push(Fact::new(blog, FactOrigin::ProfileInfo, FactCategory::Link));
        }
        if let Some(followers) = json["followers"].as_u64() {
            facts.push(Fact::new(
                format!("{} followers", followers),
                FactOrigin::ProfileInfo,
                FactCategory::Bio,
            ));
        }
        if let Some(repos) = json["public_repos"].as_u64() {
            facts.push(Fact::new(
                format!("{} public repositories", repos),
                FactOrigin::ProfileInfo,
                FactCategory::Bio,
            ));
        }

        facts
    }

    /// Map one entry of the `/users/{login}/repos` payload. Forks are
    /// skipped; a repo without a name is dropped.
    pub(super) fn map_repo_json(json: &serde_json::Value) -> Option<Fact> {
        if json["fork"].as_bool().unwrap_or(false) {
            return None;
        }
        let name = json["name"].as_str()?;
        let stars = json["stargazers_count"].as_u64().unwrap_or(0) as u32;
        let category = if stars >= 10 {
            FactCategory::Stars
        } else {
            FactCategory::Repo
        };

        let mut fact = Fact::new(name, FactOrigin::Project, category).with_stars(stars);
        if let Some(description) = json["description"].as_str() {
            fact = fact.with_description(description);
        }
        if let Some(language) = json["language"].as_str() {
            fact = fact.with_language(language);
        }
        if let Some(url) = json["html_url"].as_str() {
            fact = fact.with_details(url);
        }
        Some(fact)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{fetch_facts, PendingFacts};

// =============================================================================
// WASM: no fetch in this tree - completes immediately as empty so the
// resume fallback carries the web build
// =============================================================================

#[cfg(target_arch = "wasm32")]
pub struct PendingFacts {
    result: Option<FetchResult>,
}

#[cfg(target_arch = "wasm32")]
impl PendingFacts {
    pub fn poll(&mut self) -> Option<FetchResult> {
        self.result.take()
    }
}

#[cfg(target_arch = "wasm32")]
pub fn fetch_facts(_login: &str) -> PendingFacts {
    PendingFacts {
        result: Some(FetchResult::default()),
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::super::{FactCategory, FactOrigin};
    use super::native::{map_profile_json, map_repo_json};
    use serde_json::json;

    #[test]
    fn test_map_profile_collects_present_fields() {
        let payload = json!({
            "login": "ebonura",
            "name": "Emanuele Bonura",
            "bio": "PS1-style engines in Rust",
            "location": "Europe",
            "blog": "https://bonnie-games.itch.io",
            "followers": 12,
            "public_repos": 7
        });

        let facts = map_profile_json(&payload);
        assert_eq!(facts.len(), 5);
        assert_eq!(facts[0].name, "Emanuele Bonura");
        assert_eq!(facts[0].description.as_deref(), Some("PS1-style engines in Rust"));
        assert!(facts.iter().all(|f| f.origin == FactOrigin::ProfileInfo));
        assert!(facts.iter().any(|f| f.category == FactCategory::Location));
        assert!(facts.iter().any(|f| f.name == "12 followers"));
    }

    #[test]
    fn test_map_profile_sparse_payload_falls_back_to_login() {
        let facts = map_profile_json(&json!({ "login": "ghost" }));
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "ghost");
        assert!(facts[0].description.is_none());
    }

    #[test]
    fn test_map_repo_basic_fields() {
        let payload = json!({
            "name": "bonnie-engine",
            "description": "A fantasy console",
            "language": "Rust",
            "stargazers_count": 3,
            "html_url": "https://github.com/EBonura/bonnie-engine",
            "fork": false
        });

        let fact = map_repo_json(&payload).unwrap();
        assert_eq!(fact.name, "bonnie-engine");
        assert_eq!(fact.origin, FactOrigin::Project);
        assert_eq!(fact.category, FactCategory::Repo);
        assert_eq!(fact.star_count, Some(3));
        assert_eq!(fact.language.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_map_repo_skips_forks() {
        let payload = json!({ "name": "somebody-elses-code", "fork": true });
        assert!(map_repo_json(&payload).is_none());
    }

    #[test]
    fn test_map_repo_starred_gets_star_category() {
        let payload = json!({ "name": "popular", "stargazers_count": 128, "fork": false });
        let fact = map_repo_json(&payload).unwrap();
        assert_eq!(fact.category, FactCategory::Stars);
    }
}
