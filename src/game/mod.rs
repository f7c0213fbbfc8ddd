pub mod constants;
pub mod trail;
pub mod spatial;
pub mod collision;
pub mod state;
pub mod game_loop;
pub mod match_result;
pub mod snapshot;
pub mod bot;
