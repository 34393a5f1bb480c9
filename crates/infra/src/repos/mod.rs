pub mod clubs;
pub mod refresh_tokens;
pub mod users;

pub use clubs::{CreateClubData, UpdateClubData};
pub use refresh_tokens::CreateRefreshTokenData;
pub use users::CreateUserData;
