pub mod clock;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod highscore;
pub mod movement;
pub mod snapshot;
pub mod spawn;
pub mod timing;
pub mod waves;
