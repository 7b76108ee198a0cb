pub mod card_form;
pub mod card_panel;
pub mod filter_bar;
pub mod progress_bar;
pub mod stats_panel;
pub mod toast;
