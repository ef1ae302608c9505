pub mod client;
pub mod users;

pub use client::{api_call, build_client, set_silent};
pub use users::{HttpUserApi, UserApi};
