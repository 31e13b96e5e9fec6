use crate::schema::{BoardFile, CardsFile, GameConfig, QuizQuestion, RuleProfile};
use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tycoon_core::Board;

pub const RULES_FILE: &str = "rules.json";
pub const BOARD_FILE: &str = "board.json";
pub const CARDS_FILE: &str = "cards.json";
pub const QUESTIONS_FILE: &str = "questions.json";

/// Names of the profile directories under `assets_dir`, sorted.
pub fn available_profiles(assets_dir: &Path) -> anyhow::Result<Vec<String>> {
    let entries =
        fs::read_dir(assets_dir).with_context(|| format!("read {}", assets_dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", assets_dir.display()))?;
        if entry.path().join(RULES_FILE).is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

pub fn profile_dir(assets_dir: &Path, name: &str) -> PathBuf {
    assets_dir.join(name)
}

/// Loads and validates the profile called `name` from `assets_dir`.
pub fn load_profile(assets_dir: &Path, name: &str) -> anyhow::Result<GameConfig> {
    let dir = profile_dir(assets_dir, name);
    if !dir.join(RULES_FILE).is_file() {
        let known = available_profiles(assets_dir).unwrap_or_default();
        bail!(
            "unknown profile {name} in {} (available: {})",
            assets_dir.display(),
            known.join(", ")
        );
    }
    load_game_config(&dir).with_context(|| format!("load profile {name}"))
}

/// Reads `rules.json`, `board.json`, `cards.json` and the optional
/// `questions.json` from `dir`.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let profile: RuleProfile = load_json(dir.join(RULES_FILE))?;
    let board: BoardFile = load_json(dir.join(BOARD_FILE))?;
    let board = Board::new(board.spaces)
        .with_context(|| format!("validate {}", dir.join(BOARD_FILE).display()))?;
    let cards: CardsFile = load_json(dir.join(CARDS_FILE))?;
    let questions_path = dir.join(QUESTIONS_FILE);
    let questions: Vec<QuizQuestion> = if questions_path.exists() {
        load_json(questions_path)?
    } else {
        Vec::new()
    };

    let config = GameConfig {
        profile,
        board,
        chance: cards.chance,
        community: cards.community,
        questions,
    };
    config
        .validate()
        .with_context(|| format!("validate {}", dir.display()))?;
    tracing::debug!(
        profile = %config.profile.name,
        spaces = config.board.len(),
        chance = config.chance.len(),
        community = config.community.len(),
        questions = config.questions.len(),
        "loaded profile"
    );
    Ok(config)
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
