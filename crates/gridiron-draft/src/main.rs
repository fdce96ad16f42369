// Draft engine console entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout is the console)
// 2. Load config
// 3. Open database, resolve the draft id
// 4. Load prospects, team needs, and compensatory picks
// 5. Initialize DraftState, check for crash recovery
// 6. Create mpsc channels
// 7. Spawn app logic task and the console printer
// 8. Read commands from stdin until quit
// 9. Cleanup on exit
//
// `gridiron-draft compensatory` only runs the compensatory pick calculator
// over the configured signings file and prints the awards.

use std::path::Path;

use gridiron_draft::app;
use gridiron_draft::compensatory;
use gridiron_draft::config;
use gridiron_draft::console;
use gridiron_draft::db;
use gridiron_draft::draft;
use gridiron_draft::protocol::UserCommand;

use anyhow::Context;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Gridiron draft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {} rounds, user team {:?}",
        config.league.name,
        config.league.teams.len(),
        config.draft.rounds,
        config.league.user_team
    );

    if std::env::args().nth(1).as_deref() == Some("compensatory") {
        return run_compensatory(&config);
    }

    // 3. Open database
    let db = db::Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    let draft_id = match db.get_draft_id()? {
        Some(id) => id,
        None => {
            let id = db::Database::generate_draft_id();
            db.set_draft_id(&id)?;
            info!("New draft id {}", id);
            id
        }
    };

    // 4. Load prospects, needs, compensatory picks
    let prospects = draft::prospect::load_prospects(Path::new(&config.data_paths.prospects))
        .context("failed to load prospects")?;
    info!("Loaded {} prospects", prospects.len());

    let needs = match draft::prospect::load_team_needs(Path::new(&config.data_paths.needs)) {
        Ok(needs) => needs,
        Err(e) => {
            warn!("Team needs unavailable, AI drafts without them: {}", e);
            Vec::new()
        }
    };

    // 5. Initialize DraftState
    let mut draft_state = draft::state::DraftState::initialize(
        prospects,
        config.league.teams.clone(),
        config.league.user_team.clone(),
        config.league.year,
        config.draft.settings(),
        needs,
    );

    let signings_path = Path::new(&config.data_paths.signings);
    if signings_path.exists() {
        let signings = compensatory::load_signings(signings_path).context("failed to load signings")?;
        let awards = compensatory::calculate_compensatory_picks(&signings, &config.league.teams);
        draft_state.apply_compensatory_picks(&awards)?;
        info!("Draft order has {} picks after compensatory awards", draft_state.total_picks());
    }

    let mut app_state = app::AppState::new(config.clone(), draft_state, db, draft_id);

    match app::recover_from_db(&mut app_state) {
        Ok(true) => info!("Draft state restored from previous session"),
        Ok(false) => info!("Starting fresh draft session"),
        Err(e) => {
            error!("Crash recovery failed: {}", e);
            return Err(e.context("crash recovery failed"));
        }
    }

    // 6. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    // 7. Spawn app logic task and the printer
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            if let Some(text) = console::render_update(&update) {
                println!("{text}");
            }
        }
    });

    // 8. Read commands until quit or EOF
    println!("{}", console::HELP);
    let user_team = config.league.user_team.clone();
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match console::parse_command(&line, user_team.as_deref()) {
            Ok(Some(cmd)) => {
                let quit = cmd == UserCommand::Quit;
                if cmd_tx.send(cmd).await.is_err() || quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(console::CommandError::Help) => println!("{}", console::HELP),
            Err(e) => println!("! {e}"),
        }
    }
    let _ = cmd_tx.send(UserCommand::Quit).await;

    // 9. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;
    printer.abort();

    info!("Gridiron draft shut down cleanly");
    Ok(())
}

/// Print compensatory awards for the configured signings file.
fn run_compensatory(config: &config::Config) -> anyhow::Result<()> {
    let path = Path::new(&config.data_paths.signings);
    let signings = compensatory::load_signings(path).context("failed to load signings")?;
    info!("Loaded {} signings from {}", signings.len(), path.display());

    let results = compensatory::calculate_compensatory_picks(&signings, &config.league.teams);
    for result in results.iter().filter(|r| !r.picks.is_empty()) {
        println!("{} (net loss {:.1})", result.team_id, result.net_loss_value);
        for pick in &result.picks {
            println!(
                "  R{} #{}  {:.1}  for {}",
                pick.round, pick.pick_in_round, pick.value, pick.compensating_for_player
            );
        }
    }
    Ok(())
}

/// Initialize tracing to log to a file (stdout belongs to the console).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridiron-draft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridiron_draft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    Ok(())
}
