mod client;
mod login;

pub use client::{USER_AGENT, new_client};
pub use login::{AuthError, Credentials, Session, login, restore_or_login};
