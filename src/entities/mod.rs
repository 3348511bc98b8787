//! SeaORM entity models for the admin console's collections.

pub mod category;
pub mod highlight;
pub mod press_release;
pub mod sdg;
pub mod subscriber;
pub mod user;

mod string_list;

pub use category::Entity as Category;
pub use highlight::Entity as Highlight;
pub use press_release::Entity as PressRelease;
pub use sdg::Entity as Sdg;
pub use string_list::StringList;
pub use subscriber::Entity as Subscriber;
pub use user::Entity as User;
