pub mod authorization;
pub mod chirp;
pub mod credentials;
pub mod relationship;
pub mod session;
pub mod user;
