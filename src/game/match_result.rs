//! Match result and ranking
//!
//! Orders the roster into final standings for display and broadcast.

use crate::game::state::{GameState, PlayerId};

/// Match result information
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub winner_id: Option<PlayerId>,
    pub rankings: Vec<PlayerRanking>,
    /// Ticks the round lasted
    pub frames: u64,
}

/// Player ranking in match results
#[derive(Debug, Clone)]
pub struct PlayerRanking {
    pub player_id: PlayerId,
    pub name: String,
    pub rank: u32,
    pub score: u32,
    pub survived: bool,
}

/// Determine final standings from game state
///
/// Survivors rank above the eliminated, then by score; remaining ties
/// keep roster order (the sort is stable).
pub fn determine_result(state: &GameState) -> MatchResult {
    let mut rankings: Vec<PlayerRanking> = state
        .players
        .iter()
        .filter(|p| p.active)
        .map(|p| PlayerRanking {
            player_id: p.id,
            name: p.name.clone(),
            rank: 0,
            score: p.score,
            survived: p.alive,
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.survived
            .cmp(&a.survived)
            .then_with(|| b.score.cmp(&a.score))
    });

    for (i, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = (i + 1) as u32;
    }

    let winner_id = if state.winner_declared {
        state.players.iter().find(|p| p.in_play()).map(|p| p.id)
    } else {
        None
    };

    MatchResult {
        winner_id,
        rankings,
        frames: state.frame,
    }
}
