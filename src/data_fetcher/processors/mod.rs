pub mod date_window;
pub mod highlights;
pub mod time_formatting;

pub use date_window::{Classification, DateWindow};
pub use highlights::{
    Favorites, RankedGame, high_scoring_total, rank_top_games, top_game_candidates,
};
pub use time_formatting::{format_local_time, parse_time_of_day, today_in_zone, today_in_zone_at};
