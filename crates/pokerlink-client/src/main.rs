//! Pokerlink command-line client.
//!
//! # Usage
//!
//! ```bash
//! # Join a game and play from the terminal
//! pokerlink --server https://poker.example --game 7f3c --auth-token "$JWT"
//!
//! # Private game
//! pokerlink --server localhost:8877 --game 7f3c --password hunter2
//! ```

use std::sync::Arc;

use clap::Parser;
use pokerlink_app::{Intent, Runtime, Session, SessionConfig, SessionHandle};
use pokerlink_client::{
    ClientError, GameServerApi, SystemEnv, WsTransport,
    commands::{self, Command},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Pokerlink game client
#[derive(Parser, Debug)]
#[command(name = "pokerlink")]
#[command(about = "Join a poker game and play from the terminal")]
#[command(version)]
struct Args {
    /// Game server base URL
    #[arg(short, long, default_value = "http://localhost:8877")]
    server: String,

    /// Game to join
    #[arg(short, long)]
    game: String,

    /// Account token sent as a bearer credential
    #[arg(long)]
    auth_token: Option<String>,

    /// Password for private games
    #[arg(long)]
    password: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let api = GameServerApi::new(&args.server, args.auth_token)?;
    let joined = api.join_game(&args.game, args.password.as_deref()).await?;
    let endpoint = api.socket_url(&joined.ws_url)?;
    tracing::info!(game = %joined.game_id, %endpoint, "joined");

    // Tokens live for about a minute; fetch right before connecting.
    let token = api.ws_token().await?;

    let session = Session::new(SessionConfig::default());
    let (runtime, handle) = Runtime::new(WsTransport::new(), SystemEnv::new(), session);
    let mut runtime = tokio::spawn(runtime.run());

    handle.send(Intent::Connect { endpoint: endpoint.to_string(), token }).await;
    tokio::spawn(log_state(handle.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            result = &mut runtime => return Ok(result??),
            line = lines.next_line() => {
                let Some(line) = line? else {
                    handle.send(Intent::Quit).await;
                    break;
                };
                match commands::parse(&line) {
                    Ok(Some(Command::Intent(intent))) => {
                        if !handle.send(intent).await {
                            break;
                        }
                    },
                    Ok(Some(Command::Help)) => tracing::info!("\n{}", commands::HELP),
                    Ok(None) => {},
                    Err(e) => tracing::warn!("{e}"),
                }
            },
        }
    }

    Ok(runtime.await??)
}

/// Log each published view model that differs in a way a player cares about.
async fn log_state(handle: SessionHandle) {
    let mut rx = handle.subscribe();
    let mut last = Arc::clone(&rx.borrow_and_update());
    let mut logged_chats = last.chat_messages.last().map(|c| c.id);

    while rx.changed().await.is_ok() {
        let state = Arc::clone(&rx.borrow_and_update());

        if state.connection_state != last.connection_state {
            tracing::info!(state = %state.connection_state, "connection");
        }
        if state.game_phase != last.game_phase {
            tracing::info!(phase = ?state.game_phase, "phase");
        }
        if state.error.is_some() && state.error != last.error {
            tracing::warn!(error = state.error.as_deref().unwrap_or_default(), "server");
        }
        if state.hole_cards != last.hole_cards && !state.hole_cards.is_empty() {
            tracing::info!(cards = ?state.hole_cards, "hole cards");
        }
        if let Some(table) = &state.current_table
            && last.current_table.as_ref().map(|t| &t.community_cards) != Some(&table.community_cards)
            && !table.community_cards.is_empty()
        {
            tracing::info!(round = %table.current_round, board = ?table.community_cards, "board");
        }
        if let Some(options) = &state.action_required
            && last.action_required.is_none()
        {
            tracing::info!(
                call = options.call_amount,
                min_raise = options.min_raise,
                timeout = state.action_timeout_seconds.unwrap_or_default(),
                "your turn"
            );
        }
        if let Some(offer) = state.rebuy_offer
            && last.rebuy_offer.is_none()
        {
            tracing::info!(cost = offer.cost, chips = offer.chips, "rebuy offered: /rebuy yes|no");
        }
        if let Some(offer) = state.addon_offer
            && last.addon_offer.is_none()
        {
            tracing::info!(cost = offer.cost, chips = offer.chips, "add-on offered: /addon yes|no");
        }
        for chat in state.chat_messages.iter().filter(|c| Some(c.id) > logged_chats) {
            if !chat.optimistic {
                tracing::info!("<{}> {}", chat.player_name, chat.message);
            }
        }
        logged_chats = state.chat_messages.last().map(|c| c.id).or(logged_chats);
        if let Some(position) = state.eliminated_position
            && last.eliminated_position.is_none()
        {
            tracing::info!(position, "eliminated");
        }
        if !state.standings.is_empty() && last.standings.is_empty() {
            for standing in &state.standings {
                tracing::info!(
                    position = standing.position,
                    player = %standing.player_name,
                    prize = standing.prize,
                    "standing"
                );
            }
        }

        last = state;
    }
}
