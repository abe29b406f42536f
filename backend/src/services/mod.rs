//! Service layer for business logic and orchestration.
//!
//! Services sit between the HTTP handlers and the cache / upstream seams.
//! They own input validation and decide when the upstream provider is called.

pub mod player_directory;
pub mod seasons;
pub mod shot_grid;

pub use player_directory::{PlayerDirectory, Roster, MAX_SEARCH_RESULTS, MIN_QUERY_CHARS};
pub use seasons::{list_seasons, SEASONS};
pub use shot_grid::{
    ShotGridOptions, ShotGridQuery, ShotGridService, DEFAULT_GRID_FEET, DEFAULT_MIN_ATTEMPTS,
};
