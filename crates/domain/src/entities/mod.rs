pub mod list;
pub mod outcome;
pub mod todo;
pub mod user;

pub use list::*;
pub use outcome::*;
pub use todo::*;
pub use user::*;
