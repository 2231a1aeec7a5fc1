pub mod account;
pub mod status;

pub use account::Account;
pub use status::Status;
