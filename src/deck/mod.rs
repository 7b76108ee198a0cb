pub mod card;
pub mod sample;
pub mod store;

pub use card::{Card, CardDraft, CardId, Difficulty};
pub use store::CardStore;
