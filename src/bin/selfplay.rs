//! Self-play driver: runs batches of games between configured players
//! and records results to CSV for downstream policy analysis.

use chrono::Utc;
use clap::Parser;
use rand::prelude::*;
use rayon::prelude::*;

use hexuki::game::engine::RulesConfig;
use hexuki::logging::setup_logging;
use hexuki::recording::{CsvRecorder, GameRecord, PlayerKind};
use hexuki::search::hybrid::HybridConfig;
use hexuki::search::mcts::MctsConfig;
use hexuki::search::minimax::SolverConfig;
use hexuki::selfplay::{run_match, MatchConfig, MatchOutcome, RackVariant};

#[derive(Parser, Debug)]
#[command(name = "selfplay", about = "Run self-play games and record results")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Strategy for player 1 (random, mcts, hybrid)
    #[arg(long, default_value = "hybrid")]
    player1: PlayerKind,

    /// Strategy for player 2 (random, mcts, hybrid)
    #[arg(long, default_value = "hybrid")]
    player2: PlayerKind,

    /// MCTS simulations per move
    #[arg(long, default_value_t = 1000)]
    simulations: usize,

    /// Empty-cell threshold for switching to exact minimax
    #[arg(long, default_value_t = 6)]
    minimax_threshold: usize,

    /// Terminate MCTS rollouts with exact minimax evaluation
    #[arg(long, default_value_t = false)]
    minimax_rollouts: bool,

    /// Disable the anti-symmetry placement rule
    #[arg(long, default_value_t = false)]
    no_anti_symmetry: bool,

    /// Draw 9 random tiles per player instead of the standard 1-9 racks
    #[arg(long, default_value_t = false)]
    asymmetric_racks: bool,

    /// Base RNG seed; game i uses seed + i
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output CSV file for game records
    #[arg(short, long, default_value = "data/selfplay_results.csv")]
    output: String,

    /// Print the aggregate summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn build_config(args: &Args) -> MatchConfig {
    let mcts = MctsConfig {
        simulations: args.simulations,
        minimax_rollouts: args.minimax_rollouts,
        minimax_threshold: args.minimax_threshold,
        ..MctsConfig::default()
    };
    MatchConfig {
        player1: args.player1,
        player2: args.player2,
        rules: RulesConfig {
            anti_symmetry: !args.no_anti_symmetry,
        },
        racks: if args.asymmetric_racks {
            RackVariant::Asymmetric
        } else {
            RackVariant::Standard
        },
        hybrid: HybridConfig {
            minimax_threshold: args.minimax_threshold,
            solver: SolverConfig::default(),
            mcts,
        },
        mcts,
    }
}

#[derive(serde::Serialize)]
struct Summary {
    games: u64,
    player1_wins: u64,
    player2_wins: u64,
    draws: u64,
    avg_player1_score: f64,
    avg_player2_score: f64,
}

fn main() -> hexuki::Result<()> {
    let args = Args::parse();
    setup_logging("info");

    let config = build_config(&args);
    log::info!(
        "self-play: {} games, {} vs {}, {} sims, threshold {}",
        args.games,
        args.player1,
        args.player2,
        args.simulations,
        args.minimax_threshold
    );

    let outcomes: Vec<(u64, MatchOutcome)> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(args.seed + i);
            let outcome = run_match(&config, &mut rng)?;
            Ok((i, outcome))
        })
        .collect::<hexuki::Result<Vec<_>>>()?;

    let mut recorder = CsvRecorder::create(&args.output)?;
    let mut player1_wins = 0u64;
    let mut player2_wins = 0u64;
    let mut draws = 0u64;
    let mut score_totals = (0i64, 0i64);

    for (game_id, outcome) in &outcomes {
        match outcome.winner {
            Some(hexuki::game::board::Player::One) => player1_wins += 1,
            Some(hexuki::game::board::Player::Two) => player2_wins += 1,
            None => draws += 1,
        }
        score_totals.0 += i64::from(outcome.player1_score);
        score_totals.1 += i64::from(outcome.player2_score);

        recorder.write_game(&GameRecord {
            game_id: *game_id,
            finished_at: Utc::now().to_rfc3339(),
            player1: args.player1,
            player2: args.player2,
            winner: outcome.winner,
            player1_score: outcome.player1_score,
            player2_score: outcome.player2_score,
            move_count: outcome.moves.len() as u8,
            moves: outcome.moves.clone(),
        })?;
    }
    recorder.flush()?;

    let games = args.games.max(1);
    let summary = Summary {
        games: args.games,
        player1_wins,
        player2_wins,
        draws,
        avg_player1_score: score_totals.0 as f64 / games as f64,
        avg_player2_score: score_totals.1 as f64 / games as f64,
    };

    log::info!(
        "done: p1 {} / p2 {} / draws {} (avg scores {:.1} vs {:.1})",
        summary.player1_wins,
        summary.player2_wins,
        summary.draws,
        summary.avg_player1_score,
        summary.avg_player2_score
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).expect("summary serializes")
        );
    }

    Ok(())
}
