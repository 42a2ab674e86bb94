pub mod joke;

pub use joke::Entity as Joke;
