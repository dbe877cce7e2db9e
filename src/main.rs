use dice_arena::game::{DiceSkin, GamePhase, GameService, PacingConfig};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dice_arena=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dice arena demo session");

    let rounds = std::env::var("ARENA_ROUNDS")
        .ok()
        .and_then(|value| value.parse::<u8>().ok())
        .unwrap_or(3);

    // Instant pacing: the loop below drives the turn advancement itself.
    let service = GameService::builder()
        .with_pacing(PacingConfig::instant())
        .build();

    service.enter_setup().await;
    for name in ["Ada", "Grace", "Linus"] {
        service.add_player(name).await;
    }
    service.configure_rounds(rounds).await;
    service.select_skin(DiceSkin::Neon).await;
    service.start_game().await;

    while service.snapshot().await.phase == GamePhase::Playing {
        service.roll().await;
        service.advance_turn().await;
    }

    let snapshot = service.snapshot().await;
    if let Ok(json) = serde_json::to_string_pretty(&snapshot) {
        debug!(%json, "final snapshot");
    }
    for (index, row) in snapshot.leaderboard.iter().enumerate() {
        info!(
            rank = index + 1,
            player = %row.standing.name,
            score = row.standing.score,
            best_roll = row.stats.highest_turn_score,
            rolls = row.stats.total_rolls,
            average = format!("{:.1}", row.average_score),
            "final standing"
        );
    }
}
