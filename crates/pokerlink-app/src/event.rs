//! Reducer input events.
//!
//! Events originate from two distinct sources:
//! - Server frames delivered by the connection manager.
//! - Local lifecycle changes (socket state, optimistic chat, teardown).

use pokerlink_core::ConnectionState;
use pokerlink_proto::InboundFrame;

/// Events processed by [`crate::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Socket state changed.
    ConnectionStateChanged(ConnectionState),

    /// A frame from the server, not yet validated.
    Server(InboundFrame),

    /// Chat sent by this client, shown before the server echoes it.
    ChatOptimistic {
        /// Label to show as author.
        player_name: String,
        /// Text.
        message: String,
        /// Table-only chat.
        table_chat: bool,
    },

    /// Drop pending rebuy and add-on offers.
    ClearOffers,

    /// Another client took over this session.
    SessionReplaced,

    /// Session torn down; return to the initial state.
    Reset,
}
