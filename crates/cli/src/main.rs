use anyhow::{bail, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tycoon_core::{
    autoplay, ops, Action, DeckId, GameState, JailChoice, PendingAction, Phase, Session,
    SpecialChoice,
};
use tycoon_data::load_profile;

const SAVE_SCHEMA_VERSION: u32 = 2;
const DEFAULT_SEED: u64 = 0xC0FFEE;

#[derive(Parser, Debug)]
#[command(name = "tycoon", about = "Turn-based property trading board game")]
struct Cli {
    /// Directory holding one sub-directory per rule profile
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Rule profile to play
    #[arg(long, default_value = "hong_kong")]
    profile: String,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Seat a player (repeatable, in turn order)
    #[arg(long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// Let the built-in policy play every seat
    #[arg(long)]
    auto: bool,

    /// Stop an automatic game after this many turns
    #[arg(long, default_value_t = 200)]
    max_turns: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedGame {
    version: u32,
    state: GameState,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Play(Action),
    State,
    Board,
    Log,
    Save(PathBuf),
    Load(PathBuf),
    Help,
    Quit,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_profile(&cli.assets, &cli.profile)?;
    let players = if cli.players.is_empty() {
        vec!["Player 1".to_string(), "Player 2".to_string()]
    } else {
        cli.players.clone()
    };
    let state = ops::configure(config, &players, cli.seed)
        .with_context(|| format!("set up profile {}", cli.profile))?;
    tracing::info!(profile = %cli.profile, seed = cli.seed, players = players.len(), "new game");

    let mut session = Session::new(state);
    session.dispatch(Action::StartGame)?;
    print_events(&mut session);

    if cli.auto {
        run_auto(&mut session, cli.max_turns);
        print_standings(session.state());
        return Ok(());
    }
    run_interactive(&mut session)
}

fn run_auto(session: &mut Session, max_turns: u32) {
    let mut turns = 0;
    while turns < max_turns {
        let Some(action) = autoplay::auto_action(session.state()) else {
            break;
        };
        if action == Action::EndTurn {
            turns += 1;
        }
        if let Err(err) = session.dispatch(action) {
            tracing::warn!(%err, ?action, "auto action failed");
            break;
        }
        print_events(session);
    }
    tracing::info!(turns, over = session.state().is_over(), "auto play finished");
}

fn run_interactive(session: &mut Session) -> anyhow::Result<()> {
    print_help();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}", prompt_text(session.state()));
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let command = match parse_command(&line, session.state()) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("! {message}");
                continue;
            }
        };
        match command {
            Command::Play(action) => {
                if let Err(err) = session.dispatch(action) {
                    println!("! {err}");
                }
                print_events(session);
                if session.state().is_over() {
                    print_standings(session.state());
                }
            }
            Command::State => print_state(session.state()),
            Command::Board => print_board(session.state()),
            Command::Log => {
                for line in session.state().log.iter() {
                    println!("  {line}");
                }
            }
            Command::Save(path) => match save_game(session.state(), &path) {
                Ok(()) => println!("saved to {}", path.display()),
                Err(err) => println!("! {err:#}"),
            },
            Command::Load(path) => match load_game(&path) {
                Ok(state) => {
                    session.replace_state(state);
                    println!("loaded {}", path.display());
                    print_state(session.state());
                }
                Err(err) => println!("! {err:#}"),
            },
            Command::Help => print_help(),
            Command::Quit => break,
        }
    }
    Ok(())
}

/// Turns one input line into a command. Blank lines yield `None`.
fn parse_command(line: &str, state: &GameState) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = parts.split_first() else {
        return Ok(None);
    };
    let play = |action: Action| -> Result<Option<Command>, String> {
        Ok(Some(Command::Play(action)))
    };
    match (head.to_ascii_lowercase().as_str(), args) {
        ("roll" | "r", []) => play(Action::RollDice),
        ("roll" | "r", [a, b]) => play(Action::RollDiceWith {
            dice: (parse_die(a)?, parse_die(b)?),
        }),
        ("buy" | "b", []) => play(Action::ResolvePurchase { accept: true }),
        ("pass", []) => play(Action::ResolvePurchase { accept: false }),
        ("pay", []) => match state.pending {
            Some(PendingAction::AwaitTaxPayment { .. }) => play(Action::ResolveTaxPayment),
            _ => play(Action::ResolveRentPayment),
        },
        ("draw" | "d", []) => match state.pending {
            Some(PendingAction::AwaitCardEffectResolution { deck }) => {
                play(Action::DrawCard { deck })
            }
            _ => Err("nothing to draw".to_string()),
        },
        ("draw" | "d", [deck]) => play(Action::DrawCard {
            deck: parse_deck(deck)?,
        }),
        ("jail", [choice]) => {
            let choice = match *choice {
                "pay" => JailChoice::PayFine,
                "token" => JailChoice::UseToken,
                "roll" => JailChoice::AttemptDoubles,
                other => return Err(format!("unknown jail choice {other}")),
            };
            play(Action::ResolveJailDecision { choice })
        }
        ("upgrade" | "u", [space]) => play(Action::UpgradeProperty {
            space: parse_space(space)?,
        }),
        ("credit", [space]) => play(Action::ApplyUpgradeCredit {
            space: parse_space(space)?,
        }),
        ("mortgage", [space]) => play(Action::MortgageProperty {
            space: parse_space(space)?,
        }),
        ("unmortgage", [space]) => play(Action::UnmortgageProperty {
            space: parse_space(space)?,
        }),
        ("special", [choice]) => {
            let choice = match *choice {
                "cash" => SpecialChoice::TakeCash,
                "card" => SpecialChoice::DrawCard,
                "pass" => SpecialChoice::Perform { success: true },
                "fail" => SpecialChoice::Perform { success: false },
                other => return Err(format!("unknown special choice {other}")),
            };
            play(Action::ResolveSpecialChoice { choice })
        }
        ("quiz", [choice]) => {
            let choice: usize = choice
                .parse()
                .map_err(|_| format!("quiz answer must be a number, got {choice}"))?;
            if choice == 0 {
                return Err("quiz answers are numbered from 1".to_string());
            }
            play(Action::AnswerQuiz { choice: choice - 1 })
        }
        ("end" | "e", []) => play(Action::EndTurn),
        ("state" | "s", []) => Ok(Some(Command::State)),
        ("board", []) => Ok(Some(Command::Board)),
        ("log", []) => Ok(Some(Command::Log)),
        ("save", [path]) => Ok(Some(Command::Save(PathBuf::from(path)))),
        ("load", [path]) => Ok(Some(Command::Load(PathBuf::from(path)))),
        ("help" | "h" | "?", []) => Ok(Some(Command::Help)),
        ("quit" | "exit" | "q", []) => Ok(Some(Command::Quit)),
        _ => Err(format!("unrecognised command: {}", line.trim())),
    }
}

fn parse_die(raw: &str) -> Result<u8, String> {
    raw.parse()
        .map_err(|_| format!("die face must be a number, got {raw}"))
}

fn parse_space(raw: &str) -> Result<usize, String> {
    raw.parse()
        .map_err(|_| format!("space must be a board index, got {raw}"))
}

fn parse_deck(raw: &str) -> Result<DeckId, String> {
    DeckId::ALL
        .into_iter()
        .find(|deck| deck.label() == raw)
        .ok_or_else(|| format!("unknown deck {raw}"))
}

fn save_game(state: &GameState, path: &Path) -> anyhow::Result<()> {
    let payload = SavedGame {
        version: SAVE_SCHEMA_VERSION,
        state: state.clone(),
    };
    let body = serde_json::to_string_pretty(&payload)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}

fn load_game(path: &Path) -> anyhow::Result<GameState> {
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let payload: SavedGame =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if payload.version != SAVE_SCHEMA_VERSION {
        bail!(
            "unsupported save version {} (expected {})",
            payload.version,
            SAVE_SCHEMA_VERSION
        );
    }
    payload
        .state
        .validate()
        .with_context(|| format!("check {}", path.display()))?;
    Ok(payload.state)
}

fn print_events(session: &mut Session) {
    for event in session.drain_events() {
        println!("  {event}");
    }
}

fn prompt_text(state: &GameState) -> String {
    let waiting = match (state.phase, state.pending) {
        (_, Some(pending)) => pending.label(),
        (Phase::AwaitRoll, None) => "roll",
        (Phase::AwaitEndTurn, None) => "end turn",
        (Phase::GameOver, _) => "game over",
        _ => "setup",
    };
    format!("{} [{waiting}]> ", state.current_player().name)
}

fn print_help() {
    println!("commands:");
    println!("  roll [A B]           roll the dice (or fix both faces)");
    println!("  buy | pass           answer a purchase offer");
    println!("  quiz N               answer the purchase quiz with option N");
    println!("  pay                  pay the rent or tax owed");
    println!("  draw [deck]          draw the card you landed on");
    println!("  jail pay|token|roll  leave jail");
    println!("  special cash|card    take the payout or a card at a special space");
    println!("  special pass|fail    report the oratory challenge result");
    println!("  upgrade N | credit N develop space N with cash or a free credit");
    println!("  mortgage N | unmortgage N");
    println!("  end                  end your turn");
    println!("  state | board | log  inspect the game");
    println!("  save PATH | load PATH");
    println!("  quit");
}

fn print_state(state: &GameState) {
    println!("== {} ==", state.config.profile.name);
    println!("phase {:?} | pending {:?}", state.phase, state.pending);
    for player in &state.players {
        let marker = if player.id == state.current { '*' } else { ' ' };
        let status = if player.bankrupt {
            " bankrupt".to_string()
        } else if player.is_jailed() {
            " jailed".to_string()
        } else {
            String::new()
        };
        println!(
            "{marker} {} ${} at {} | {} owned | bail {} shield {} credit {}{status}",
            player.name,
            player.cash,
            state
                .config
                .board
                .space(player.position)
                .map_or("?", |space| space.name.as_str()),
            player.owned.len(),
            player.jail_tokens,
            player.rent_shields,
            player.upgrade_credits,
        );
    }
}

fn print_board(state: &GameState) {
    for space in state.config.board.spaces() {
        let mut line = format!("{:>2} {:<12} {}", space.id, space.kind.label(), space.name);
        if let Some(price) = space.price {
            line.push_str(&format!(" ${price}"));
        }
        if let Some(record) = state.ownership_of(space.id) {
            if let Some(owner) = record.owner.and_then(|id| state.player(id)) {
                line.push_str(&format!(" [{} L{}", owner.name, record.level));
                if record.mortgaged {
                    line.push_str(" mortgaged");
                }
                line.push(']');
            }
        }
        let here: Vec<&str> = state
            .players
            .iter()
            .filter(|player| !player.bankrupt && player.position == space.id)
            .map(|player| player.name.as_str())
            .collect();
        if !here.is_empty() {
            line.push_str(&format!(" <- {}", here.join(", ")));
        }
        println!("{line}");
    }
}

fn print_standings(state: &GameState) {
    match state.winner() {
        Some(winner) => println!("winner: {}", winner.name),
        None => println!("no winner yet"),
    }
    let mut players: Vec<_> = state.players.iter().collect();
    players.sort_by_key(|player| (player.bankrupt, std::cmp::Reverse(player.cash)));
    for player in players {
        println!(
            "  {:<12} ${:<8} {} properties{}",
            player.name,
            player.cash,
            player.owned.len(),
            if player.bankrupt { " (bankrupt)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets");
        let config = load_profile(&assets, "hong_kong").unwrap();
        ops::start_game(&ops::configure(config, &["Ada", "Bo"], 3).unwrap())
    }

    fn action(line: &str, state: &GameState) -> Action {
        match parse_command(line, state) {
            Ok(Some(Command::Play(action))) => action,
            other => panic!("{line}: {other:?}"),
        }
    }

    #[test]
    fn parses_turn_commands() {
        let state = state();
        assert_eq!(action("roll", &state), Action::RollDice);
        assert_eq!(
            action("roll 3 4", &state),
            Action::RollDiceWith { dice: (3, 4) }
        );
        assert_eq!(
            action("jail token", &state),
            Action::ResolveJailDecision {
                choice: JailChoice::UseToken
            }
        );
        assert_eq!(
            action("special fail", &state),
            Action::ResolveSpecialChoice {
                choice: SpecialChoice::Perform { success: false }
            }
        );
        assert_eq!(action("quiz 2", &state), Action::AnswerQuiz { choice: 1 });
        assert_eq!(
            action("draw community", &state),
            Action::DrawCard {
                deck: DeckId::Community
            }
        );
    }

    #[test]
    fn pay_follows_what_is_owed() {
        let mut state = state();
        state.pending = Some(PendingAction::AwaitTaxPayment {
            space: 4,
            amount: 2000,
        });
        assert_eq!(action("pay", &state), Action::ResolveTaxPayment);
        state.pending = None;
        assert_eq!(action("pay", &state), Action::ResolveRentPayment);
    }

    #[test]
    fn rejects_bad_input() {
        let state = state();
        assert_eq!(parse_command("   ", &state), Ok(None));
        assert!(parse_command("upgrade x", &state).is_err());
        assert!(parse_command("quiz 0", &state).is_err());
        assert!(parse_command("jail bribe", &state).is_err());
        assert!(parse_command("draw", &state).is_err());
        assert!(parse_command("dance", &state).is_err());
    }

    #[test]
    fn saves_round_trip() {
        let state = ops::roll_dice(&state());
        let path = std::env::temp_dir().join(format!("tycoon-save-{}.json", std::process::id()));
        save_game(&state, &path).unwrap();
        assert_eq!(load_game(&path).unwrap(), state);
        fs::remove_file(path).ok();
    }

    #[test]
    fn broken_save_is_refused() {
        let mut state = state();
        state.current = 7;
        let path = std::env::temp_dir().join(format!("tycoon-broken-{}.json", std::process::id()));
        save_game(&state, &path).unwrap();
        let err = load_game(&path).unwrap_err();
        assert!(format!("{err:#}").contains("current player 7"), "{err:#}");
        fs::remove_file(path).ok();
    }
}
