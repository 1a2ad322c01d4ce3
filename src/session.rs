//! Game session management: the authoritative wrapper around the rules engine.
//!
//! Each session owns one [`Game`]. The session is the only place that
//! mutates it, after checking that the requesting player holds the seat
//! whose turn it is.

use derive_more::{Display, Error};
use eos_rules::{
    Action, Board, EngineError, FinalScore, Game, IllegalAction, Layout, RuleTable, ScoringTable,
    Side, Snapshot, Victory, WinCondition, final_score,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Unique identifier for a player.
pub type PlayerId = String;

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player's unique ID.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Side this player controls.
    pub side: Side,
}

/// Final scores for both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    /// Player 1's breakdown.
    pub player1: FinalScore,
    /// Player 2's breakdown.
    pub player2: FinalScore,
}

/// Why a session request failed.
#[derive(Debug, Clone, Display, Error)]
pub enum SessionError {
    /// No session has this id.
    #[display("Session {} not found", id)]
    SessionNotFound {
        /// Requested session.
        id: SessionId,
    },

    /// A session with this id already exists.
    #[display("Session {} already exists", id)]
    SessionExists {
        /// Requested session.
        id: SessionId,
    },

    /// Both seats are taken.
    #[display("Session already has 2 players")]
    SeatsTaken,

    /// The player id is already seated.
    #[display("Player {} is already seated", player)]
    DuplicatePlayer {
        /// Requested player.
        player: PlayerId,
    },

    /// The player id is not seated in this session.
    #[display("Unknown player {}", player)]
    UnknownPlayer {
        /// Requested player.
        player: PlayerId,
    },

    /// The player's side is not to move.
    #[display("Not your turn. Waiting for {}", waiting_for)]
    NotYourTurn {
        /// Side to move.
        waiting_for: Side,
    },

    /// The game is already decided.
    #[display("Game is already over")]
    GameOver,

    /// The engine refused the action; nothing changed.
    #[display("Illegal action: {}", _0)]
    Illegal(IllegalAction),

    /// The engine failed or halted.
    #[display("{}", _0)]
    Engine(EngineError),
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::IllegalAction(IllegalAction::GameOver) => SessionError::GameOver,
            EngineError::IllegalAction(reason) => SessionError::Illegal(reason),
            other => SessionError::Engine(other),
        }
    }
}

/// A game with up to two seated players.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session ID.
    pub id: SessionId,
    /// The engine instance.
    pub game: Game,
    /// Player 1's seat.
    pub player1: Option<Player>,
    /// Player 2's seat.
    pub player2: Option<Player>,
}

impl GameSession {
    /// Creates a new game session on `board`.
    #[instrument(skip(rules, board))]
    pub fn new(id: SessionId, rules: Arc<RuleTable>, board: Board) -> Result<Self, SessionError> {
        info!(session_id = %id, "Creating new game session");
        Ok(Self {
            id,
            game: Game::new(rules, board)?,
            player1: None,
            player2: None,
        })
    }

    /// Seats a player in the first free seat and returns it.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn register_player(&mut self, id: PlayerId, name: String) -> Result<Player, SessionError> {
        if self.player(&id).is_some() {
            warn!(player_id = %id, "Player already seated");
            return Err(SessionError::DuplicatePlayer { player: id });
        }
        let side = if self.player1.is_none() {
            Side::Player1
        } else if self.player2.is_none() {
            Side::Player2
        } else {
            warn!(player_id = %id, "Session already has 2 players");
            return Err(SessionError::SeatsTaken);
        };
        let player = Player { id, name, side };
        info!(player_id = %player.id, %side, "Player seated");
        *self.seat_mut(side) = Some(player.clone());
        Ok(player)
    }

    fn seat_mut(&mut self, side: Side) -> &mut Option<Player> {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    /// The seated player with this id.
    pub fn player(&self, player_id: &str) -> Option<&Player> {
        [self.player1.as_ref(), self.player2.as_ref()]
            .into_iter()
            .flatten()
            .find(|p| p.id == player_id)
    }

    /// Checks that `player_id` is seated and holds the side to move.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn check_turn(&self, player_id: &str) -> Result<Side, SessionError> {
        let Some(player) = self.player(player_id) else {
            debug!(player_id, "Player not found in session");
            return Err(SessionError::UnknownPlayer {
                player: player_id.to_string(),
            });
        };
        if self.game.state().is_over() {
            return Err(SessionError::GameOver);
        }
        let to_move = self.game.current_turn();
        if player.side != to_move {
            warn!(player_id, player_side = %player.side, %to_move, "Player tried to act out of turn");
            return Err(SessionError::NotYourTurn {
                waiting_for: to_move,
            });
        }
        Ok(player.side)
    }

    /// Applies an action for `player_id` and returns the new snapshot.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn act(&mut self, player_id: &str, action: Action) -> Result<Snapshot, SessionError> {
        self.check_turn(player_id)?;
        self.game.apply(action).map_err(|e| {
            warn!(player_id, %action, error = %e, "Action refused");
            SessionError::from(e)
        })?;
        info!(
            player_id,
            %action,
            phase = %self.game.state().phase(),
            "Action accepted"
        );
        Ok(self.game.snapshot())
    }

    /// Ends the game with the opponent of `player_id` as winner.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn resign(&mut self, player_id: &str) -> Result<Snapshot, SessionError> {
        let side = self
            .player(player_id)
            .map(|p| p.side)
            .ok_or_else(|| SessionError::UnknownPlayer {
                player: player_id.to_string(),
            })?;
        self.game
            .declare_outcome(Victory::player(side.opponent(), WinCondition::Resignation))?;
        info!(player_id, %side, "Player resigned");
        Ok(self.game.snapshot())
    }

    /// Ends the game because `side` ran out of time.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn timeout(&mut self, side: Side) -> Result<Snapshot, SessionError> {
        self.game
            .declare_outcome(Victory::player(side.opponent(), WinCondition::Timeout))?;
        info!(%side, "Side timed out");
        Ok(self.game.snapshot())
    }

    /// Final scores for both sides under `table`.
    pub fn scores(&self, table: &ScoringTable) -> Scores {
        let state = self.game.state();
        let victory = state.winner();
        let score_for = |side| final_score(state.move_log(), side, victory.as_ref(), table);
        Scores {
            player1: score_for(Side::Player1),
            player2: score_for(Side::Player2),
        }
    }
}

/// Manages all game sessions.
///
/// Cheap to clone; clones share the same sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, GameSession>>>,
    rules: Arc<RuleTable>,
    board: Arc<Board>,
    scoring: Arc<ScoringTable>,
    next_id: Arc<AtomicU64>,
}

impl SessionManager {
    /// Creates a manager whose sessions start from `layout` under `rules`.
    #[instrument(skip_all)]
    pub fn new(rules: RuleTable, layout: &Layout, scoring: ScoringTable) -> Result<Self, SessionError> {
        let board = layout.build_board().map_err(EngineError::from)?;
        info!(pieces = board.piece_count(), "Creating session manager");
        Ok(Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            rules: Arc::new(rules),
            board: Arc::new(board),
            scoring: Arc::new(scoring),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// A manager with the built-in rules, layout and scoring.
    pub fn standard() -> Result<Self, SessionError> {
        let rules = RuleTable::standard().map_err(EngineError::from)?;
        let layout = Layout::standard().map_err(EngineError::from)?;
        Self::new(rules, &layout, ScoringTable::default())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, GameSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a session, generating an id when none is given.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: Option<SessionId>) -> Result<SessionId, SessionError> {
        let id =
            id.unwrap_or_else(|| format!("game-{}", self.next_id.fetch_add(1, Ordering::Relaxed)));
        let mut sessions = self.lock();
        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::SessionExists { id });
        }
        let session = GameSession::new(id.clone(), Arc::clone(&self.rules), (*self.board).clone())?;
        sessions.insert(id.clone(), session);
        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Runs `f` on a session while holding the lock.
    pub fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::SessionNotFound { id: id.to_string() }
        })?;
        f(session)
    }

    /// A copy of a session.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<GameSession> {
        let session = self.lock().get(id).cloned();
        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }
        session
    }

    /// Drops a session, returning it.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Result<GameSession, SessionError> {
        let session = self.lock().remove(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::SessionNotFound { id: id.to_string() }
        })?;
        info!(
            session_id = id,
            decided = session.game.state().is_over(),
            "Removed session"
        );
        Ok(session)
    }

    /// Lists all session ids.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Seats a player.
    pub fn register_player(
        &self,
        session_id: &str,
        player_id: PlayerId,
        name: String,
    ) -> Result<Player, SessionError> {
        self.with_session(session_id, |session| session.register_player(player_id, name))
    }

    /// Applies an action on behalf of a player.
    pub fn act(
        &self,
        session_id: &str,
        player_id: &str,
        action: Action,
    ) -> Result<Snapshot, SessionError> {
        self.with_session(session_id, |session| session.act(player_id, action))
    }

    /// Resigns on behalf of a player.
    pub fn resign(&self, session_id: &str, player_id: &str) -> Result<Snapshot, SessionError> {
        self.with_session(session_id, |session| session.resign(player_id))
    }

    /// Ends a game on time for `side`.
    pub fn timeout(&self, session_id: &str, side: Side) -> Result<Snapshot, SessionError> {
        self.with_session(session_id, |session| session.timeout(side))
    }

    /// Current snapshot of a session.
    pub fn snapshot(&self, session_id: &str) -> Result<Snapshot, SessionError> {
        self.with_session(session_id, |session| Ok(session.game.snapshot()))
    }

    /// Final scores of a session under the configured table.
    pub fn scores(&self, session_id: &str) -> Result<Scores, SessionError> {
        let table = Arc::clone(&self.scoring);
        self.with_session(session_id, |session| Ok(session.scores(&table)))
    }
}
