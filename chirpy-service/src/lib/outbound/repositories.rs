pub mod chirp;
pub mod follow;
pub mod friendship;
pub mod memory;
pub mod refresh_token;
pub mod user;

pub use chirp::PostgresChirpRepository;
pub use follow::PostgresFollowRepository;
pub use friendship::PostgresFriendshipRepository;
pub use memory::InMemoryStore;
pub use refresh_token::PostgresRefreshTokenRepository;
pub use user::PostgresUserRepository;
