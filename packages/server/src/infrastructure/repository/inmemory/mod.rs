pub mod message;
pub mod project;
pub mod user;

pub use message::InMemoryMessageRepository;
pub use project::InMemoryProjectRepository;
pub use user::InMemoryUserRepository;
