mod card;
mod gesture;
mod pool;
mod timeline;

pub use card::{CardColor, DeckCard};
pub use gesture::{GesturePhase, Motion, SwipeController, DEAD_ZONE, DRAG_ELASTIC, SWIPE_THRESHOLD};
pub use pool::{draw, shuffle, Pool};
pub use timeline::{Deck, Direction, Neighbors};
