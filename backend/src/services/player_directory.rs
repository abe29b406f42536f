//! Player name search over a static roster.
//!
//! The roster is loaded once at startup and never mutated, so
//! [`PlayerDirectory`] can be shared across handlers without locking.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Player, PlayerSummary};

/// Upper bound on the number of matches returned by a search.
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Shortest accepted query, in characters.
pub const MIN_QUERY_CHARS: usize = 2;

const EMBEDDED_ROSTER: &str = include_str!("../../data/players.json");

/// Immutable list of players in source order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    // Lowercased full names, index-aligned with `players`.
    folded_names: Vec<String>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        let folded_names = players.iter().map(|p| p.full_name.to_lowercase()).collect();
        Self {
            players,
            folded_names,
        }
    }

    /// Parse a roster from a JSON array of `{id, full_name, is_active}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let players: Vec<Player> = serde_json::from_str(json)?;
        Ok(Self::new(players))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read roster file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse roster file {}", path.display()))
    }

    /// The roster compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_ROSTER).context("Embedded roster is not valid JSON")
    }

    /// `path` when given, the embedded roster otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Case-insensitive substring search over a [`Roster`].
#[derive(Debug, Clone)]
pub struct PlayerDirectory {
    roster: Arc<Roster>,
}

impl PlayerDirectory {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: Arc::new(roster),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Players whose full name contains `query`, ignoring case, in roster
    /// order and capped at [`MAX_SEARCH_RESULTS`].
    ///
    /// Surrounding whitespace is ignored. Queries shorter than
    /// [`MIN_QUERY_CHARS`] characters are rejected.
    pub fn search(&self, query: &str) -> ServiceResult<Vec<PlayerSummary>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(ServiceError::invalid(format!(
                "q must be at least {} characters",
                MIN_QUERY_CHARS
            )));
        }

        let needle = query.to_lowercase();
        let matches: Vec<PlayerSummary> = self
            .roster
            .players
            .iter()
            .zip(&self.roster.folded_names)
            .filter(|(_, name)| name.contains(&needle))
            .take(MAX_SEARCH_RESULTS)
            .map(|(player, _)| PlayerSummary::from(player))
            .collect();

        debug!(query = %needle, matches = matches.len(), "player search");
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerId;

    fn player(id: i64, name: &str) -> Player {
        Player {
            id: PlayerId::new(id),
            full_name: name.to_string(),
            is_active: true,
        }
    }

    fn directory() -> PlayerDirectory {
        PlayerDirectory::new(Roster::new(vec![
            player(2544, "LeBron James"),
            player(202695, "Kawhi Leonard"),
            player(201939, "Stephen Curry"),
            player(203999, "Nikola Jokić"),
        ]))
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let found = directory().search("bron").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, PlayerId::new(2544));
        assert_eq!(found[0].name, "LeBron James");

        let found = directory().search("CURRY").unwrap();
        assert_eq!(found[0].name, "Stephen Curry");
    }

    #[test]
    fn test_search_matches_anywhere_in_name() {
        // "le" hits the start of LeBron and the start of Leonard.
        let names: Vec<String> = directory()
            .search("le")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["LeBron James", "Kawhi Leonard"]);
    }

    #[test]
    fn test_search_handles_non_ascii_names() {
        let found = directory().search("JOKIĆ").unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_short_query_is_rejected() {
        let err = directory().search("l").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidParameter(_)));
        assert!(directory().search("  a ").is_err());
        assert!(directory().search("").is_err());
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(directory().search("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_results_are_capped() {
        let players = (0..50).map(|i| player(i, &format!("Player {}", i))).collect();
        let directory = PlayerDirectory::new(Roster::new(players));
        let found = directory.search("player").unwrap();
        assert_eq!(found.len(), MAX_SEARCH_RESULTS);
        assert_eq!(found[0].id, PlayerId::new(0));
        assert_eq!(found[19].id, PlayerId::new(19));
    }

    #[test]
    fn test_embedded_roster_loads() {
        let roster = Roster::embedded().unwrap();
        assert!(!roster.is_empty());
        let directory = PlayerDirectory::new(roster);
        let found = directory.search("lebron").unwrap();
        assert_eq!(found[0].id, PlayerId::new(2544));
    }

    #[test]
    fn test_roster_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        fs::write(&path, r#"[{"id": 1, "full_name": "Test Player"}]"#).unwrap();

        let roster = Roster::load(Some(path.as_path())).unwrap();
        assert_eq!(roster.len(), 1);
        assert!(!roster.players()[0].is_active);
    }

    #[test]
    fn test_roster_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Roster::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read roster file"));
    }
}
