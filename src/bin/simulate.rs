use std::io::Write;

use gameai::chess::ChessGame;
use gameai::eval::{EvalConfig, Weights};
use gameai::piece::Player;
use gameai::search::{pick_move, SearchConfig};
use gameai::variant::ChessVariant;

const MAX_MOVES: usize = 150;
const GAMES_PER_MATCHUP: usize = 10;
const PHASE2_GAMES: usize = 10;
const VARIANT: ChessVariant = ChessVariant::LosAlamos;

#[derive(Debug)]
struct MatchResult {
    a_wins: u32,
    b_wins: u32,
    draws: u32,
}

type Tweak = fn(&mut Weights);

fn search_config() -> SearchConfig {
    SearchConfig {
        depth: 1,
        randomize_ties: true,
        seed: None,
    }
}

/// Plays one game and returns the winner, `None` for a draw or the move cap.
fn play_game(one: &Weights, two: &Weights) -> Option<Player> {
    let search = search_config();
    let mut game = ChessGame::new(VARIANT);
    let mut player = Player::One;

    while !game.game_ended(player) && game.number_of_moves() < MAX_MOVES {
        let weights = if player == Player::One { one } else { two };
        game.set_eval_config(EvalConfig {
            weights: *weights,
            ..*game.eval_config()
        });
        match pick_move(&game, player, &search) {
            Some(result) if game.apply_move(player, result.mv) => player = player.opponent(),
            _ => break,
        }
    }
    game.winner()
}

fn run_matchup(
    label_a: &str,
    a: &Weights,
    label_b: &str,
    b: &Weights,
    num_games: usize,
) -> MatchResult {
    let mut result = MatchResult {
        a_wins: 0,
        b_wins: 0,
        draws: 0,
    };

    // Each side moves first in half of the games.
    for i in 0..num_games {
        let a_is_one = i % 2 == 0;
        let (one, two) = if a_is_one { (a, b) } else { (b, a) };
        match play_game(one, two) {
            Some(winner) if (winner == Player::One) == a_is_one => result.a_wins += 1,
            Some(_) => result.b_wins += 1,
            None => result.draws += 1,
        }
    }

    println!(
        "  {label_a} vs {label_b}: {label_a} wins {}, {label_b} wins {}, \
         draws {} (out of {num_games})",
        result.a_wins, result.b_wins, result.draws
    );
    std::io::stdout().flush().ok();
    result
}

/// (category, label, change to the default weights)
const VARIATIONS: [(&str, &str, Tweak); 14] = [
    ("material", "material=20", |w: &mut Weights| w.material = 20),
    ("material", "material=45", |w: &mut Weights| w.material = 45),
    ("doubled", "doubled=0", |w: &mut Weights| w.doubled_pawn = 0),
    ("doubled", "doubled=15", |w: &mut Weights| w.doubled_pawn = 15),
    ("isolated", "isolated=0", |w: &mut Weights| w.isolated_pawn = 0),
    ("isolated", "isolated=25", |w: &mut Weights| w.isolated_pawn = 25),
    ("passed", "passed=10", |w: &mut Weights| w.passed_pawn = 10),
    ("passed", "passed=40", |w: &mut Weights| w.passed_pawn = 40),
    ("mobility", "mobility=5", |w: &mut Weights| w.mobility = 5),
    ("mobility", "mobility=40", |w: &mut Weights| w.mobility = 40),
    ("minor", "minor=50", |w: &mut Weights| w.minor_developed = 50),
    ("minor", "minor=400", |w: &mut Weights| w.minor_developed = 400),
    ("rooks", "rooks=100", |w: &mut Weights| w.rooks_connected = 100),
    ("rooks", "rooks=600", |w: &mut Weights| w.rooks_connected = 600),
];

fn main() {
    println!("=== {} weight tuning (depth 1) ===", VARIANT.title());
    println!("Games per matchup: {GAMES_PER_MATCHUP}, max moves per game: {MAX_MOVES}\n");

    let baseline = Weights::default();

    // Phase 1: each variation against the defaults.
    println!("--- Phase 1: Each variation vs baseline ---\n");
    let mut scores: Vec<(&str, &str, Tweak, i32)> = Vec::new();
    for &(category, label, tweak) in &VARIATIONS {
        let mut weights = baseline;
        tweak(&mut weights);
        let result = run_matchup(label, &weights, "baseline", &baseline, GAMES_PER_MATCHUP);
        scores.push((category, label, tweak, result.a_wins as i32 - result.b_wins as i32));
    }

    scores.sort_by(|a, b| b.3.cmp(&a.3));
    println!("\n--- Phase 1 Rankings (net wins vs baseline) ---\n");
    for (_, label, _, net) in &scores {
        println!("  {net:>+4}  {label}");
    }

    // Phase 2: best improvement per category, combined.
    println!("\n--- Phase 2: Combined best weights ---\n");
    let mut combined = baseline;
    let mut seen: Vec<&str> = Vec::new();
    for &(category, label, tweak, net) in &scores {
        if seen.contains(&category) {
            continue;
        }
        seen.push(category);
        if net > 0 {
            println!("    {category}: {label} (net {net:+})");
            tweak(&mut combined);
        } else {
            println!("    {category}: baseline (no improvement found)");
        }
    }

    println!("\n  Combined weights: {combined:?}");
    println!("\n  Testing combined vs baseline ({PHASE2_GAMES} games)...\n");
    let result = run_matchup("combined", &combined, "baseline", &baseline, PHASE2_GAMES);

    println!("\n--- Final Result ---\n");
    println!(
        "  Combined wins: {}, Baseline wins: {}, Draws: {}",
        result.a_wins, result.b_wins, result.draws
    );
    if result.a_wins > result.b_wins {
        println!("  The combined weights are BETTER than baseline:");
        println!("  {}", serde_json::to_string_pretty(&combined).unwrap_or_default());
    } else {
        println!("  No improvement over baseline, keeping defaults:");
        println!("  {baseline:?}");
    }
}
