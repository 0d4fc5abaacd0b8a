pub mod help_overlay;
pub mod next_modal;
pub mod player_bar;
pub mod settings;
pub mod station_list;
pub mod transcript;
