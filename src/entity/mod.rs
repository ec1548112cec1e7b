pub mod favorites;
pub mod news;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod users;

pub use favorites::Entity as Favorites;
pub use news::Entity as News;
pub use notifications::Entity as Notifications;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use users::Entity as Users;
