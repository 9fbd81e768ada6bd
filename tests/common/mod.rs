#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use account_finder::sources::{AccountSource, DiscoveredAccount, FetchError};
use account_finder::{Platform, PlatformProfile, SecondaryLookups};
use async_trait::async_trait;
use chess_core::{GameRecord, PlayerColor};

/// In-memory platform. Patterns that name an account discover it; prefix
/// matches behave like a search endpoint.
pub struct MockSource {
    platform: Platform,
    profiles: HashMap<String, PlatformProfile>,
    /// Accounts that discovery confirms but whose profile fetch fails.
    broken: HashSet<String>,
    /// Also return every pattern as an unconfirmed guess.
    guess_patterns: bool,
    pub discover_calls: Mutex<Vec<String>>,
    pub profile_calls: Mutex<Vec<(String, SecondaryLookups)>>,
}

impl MockSource {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            profiles: HashMap::new(),
            broken: HashSet::new(),
            guess_patterns: false,
            discover_calls: Mutex::new(Vec::new()),
            profile_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_profile(mut self, profile: PlatformProfile) -> Self {
        self.profiles.insert(profile.handle.to_lowercase(), profile);
        self
    }

    pub fn with_broken(mut self, handle: &str) -> Self {
        self.broken.insert(handle.to_lowercase());
        self
    }

    pub fn guessing(mut self) -> Self {
        self.guess_patterns = true;
        self
    }

    pub fn discovered_patterns(&self) -> Vec<String> {
        self.discover_calls.lock().unwrap().clone()
    }

    pub fn profile_fetches(&self) -> Vec<String> {
        self.profile_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(h, _)| h.clone())
            .collect()
    }
}

#[async_trait]
impl AccountSource for MockSource {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn discover(&self, pattern: &str) -> Result<Vec<DiscoveredAccount>, FetchError> {
        self.discover_calls.lock().unwrap().push(pattern.to_string());
        let key = pattern.to_lowercase();

        let mut found: Vec<DiscoveredAccount> = self
            .profiles
            .values()
            .map(|p| &p.handle)
            .chain(self.broken.iter())
            .filter(|h| h.to_lowercase() == key)
            .map(|h| DiscoveredAccount::confirmed(h))
            .collect();
        if self.guess_patterns && found.is_empty() {
            found.push(DiscoveredAccount::guess(pattern));
        }
        Ok(found)
    }

    async fn fetch_profile(
        &self,
        handle: &str,
        lookups: SecondaryLookups,
    ) -> Result<Option<PlatformProfile>, FetchError> {
        self.profile_calls
            .lock()
            .unwrap()
            .push((handle.to_string(), lookups));
        let key = handle.to_lowercase();

        if self.broken.contains(&key) {
            return Err(FetchError::Network("connection reset".into()));
        }
        if let Some(profile) = self.profiles.get(&key) {
            return Ok(Some(profile.clone()));
        }
        if self.guess_patterns {
            return Err(FetchError::Status(404));
        }
        Ok(None)
    }
}

pub fn profile(handle: &str) -> PlatformProfile {
    PlatformProfile::bare(handle)
}

/// Game from space-separated SAN moves.
pub fn game(moves: &str) -> GameRecord {
    GameRecord::new(
        moves.split_whitespace().map(str::to_string).collect(),
        "1-0",
        PlayerColor::White,
    )
}

pub fn games(lines: &[&str]) -> Vec<GameRecord> {
    lines.iter().map(|l| game(l)).collect()
}
