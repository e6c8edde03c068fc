//! Engine against itself.
//!
//! Usage: `selfplay [VARIANT] [CONFIG.json]`. The variant name on the command
//! line wins over the one in the config file. Set `RUST_LOG=debug` to see
//! every move and search result.

use std::env;

use gameai::chess::ChessGame;
use gameai::config::GameConfig;
use gameai::error::ChessResult;
use gameai::pgn::{GameRecord, PlayerInfo};
use gameai::piece::Player;
use gameai::search::pick_move;
use gameai::variant::ChessVariant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAX_MOVES: usize = 200;

fn main() -> ChessResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config = match args.get(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(name) = args.first() {
        config.variant = name.parse::<ChessVariant>()?;
    }

    println!("GameAI selfplay (built {})", env!("BUILD_TIMESTAMP"));
    let mut game = ChessGame::with_config(&config);
    println!("{}\n", game.description());

    let mut player = Player::One;
    while !game.game_ended(player) && game.number_of_moves() < MAX_MOVES {
        let Some(result) = pick_move(&game, player, &config.search) else {
            break;
        };
        if !game.apply_move(player, result.mv) {
            break;
        }
        info!(
            ply = game.number_of_moves(),
            %player,
            mv = %result.mv,
            score = result.score,
            evals = result.evals,
            "move"
        );
        player = player.opponent();
    }

    println!("{game}");
    match game.winner() {
        Some(winner) => println!("Player {winner} wins by {}", game.win_by()),
        None if game.win_by().is_draw() => println!("Draw: {}", game.win_by()),
        None => println!("No result after {} moves", game.number_of_moves()),
    }

    let engine = PlayerInfo::program("Minimax");
    let record = GameRecord::from_game(&game, &engine, &engine);
    println!("\n{}", record.to_pgn());
    Ok(())
}
