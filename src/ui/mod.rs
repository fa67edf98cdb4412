//! Plain-text views of the drawer and the play/pause control

pub mod play_pause;
pub mod search_bar;
