mod card_content;
mod error_display;
mod joke_deck;
pub mod joke_editor;
mod joke_row;
mod loading_spinner;
mod login_form;

pub use card_content::CardContent;
pub use error_display::ErrorDisplay;
pub use joke_deck::JokeDeck;
pub use joke_editor::JokeEditor;
pub use joke_row::JokeRow;
pub use loading_spinner::LoadingSpinner;
pub use login_form::LoginForm;
