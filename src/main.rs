use tracing::{info, Level};

use kurve_engine::config::SimConfig;
use kurve_engine::game::bot;
use kurve_engine::game::constants::physics::DT;
use kurve_engine::game::game_loop::SimEvent;
use kurve_engine::game::match_result;
use kurve_engine::session::HostSession;

/// Headless demo: a round of computer-driven players, logged to stdout
fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Kurve Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: arena {}x{}, cell_size={}, snapshot_rate={}",
        config.arena_width, config.arena_height, config.cell_size, config.snapshot_rate
    );

    let mut session = HostSession::new(config);
    let bots: Vec<_> = ["Red", "Green", "Blue", "Yellow"]
        .iter()
        .map(|name| {
            session
                .game_loop
                .add_player((*name).to_string())
                .ok_or_else(|| anyhow::anyhow!("roster full"))
        })
        .collect::<Result<_, _>>()?;
    session.game_loop.force_reset();

    session.on_winner(|id| info!(id, "round won"));
    session.on_draw(|| info!("round drawn"));
    session.on_publish(|snapshot| {
        // Once a second is plenty for a console sink
        if snapshot.frame % 60 == 0 {
            info!(
                frame = snapshot.frame,
                alive = snapshot.players.iter().filter(|p| p.alive).count(),
                "snapshot published"
            );
        }
        Ok(())
    });

    // Fixed-step drive: one DT per advance keeps the demo deterministic
    // apart from the random spawn placement
    let max_ticks = 60 * 120;
    for _ in 0..max_ticks {
        for &id in &bots {
            let (left, right) = bot::steer(id, session.game_loop.state());
            session.game_loop.set_input(id, left, right);
        }
        for event in session.advance(DT) {
            if let SimEvent::PlayerDied { id, frame } = event {
                info!(id, frame, "player eliminated");
            }
        }
        if session.game_loop.state().is_terminal() {
            break;
        }
    }

    let result = match_result::determine_result(session.game_loop.state());
    for standing in &result.rankings {
        info!(
            rank = standing.rank,
            name = %standing.name,
            score = standing.score,
            survived = standing.survived,
            "final standing"
        );
    }
    info!(frames = result.frames, "match over");

    Ok(())
}
