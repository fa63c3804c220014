pub mod memory;
pub mod postgres;
pub mod profiles;
pub mod redis;
pub mod repository;

pub use memory::InMemoryProfileRepository;
pub use postgres::create_pool;
pub use profiles::PgProfileRepository;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;
pub use repository::ProfileRepository;

#[cfg(test)]
pub use repository::MockProfileRepository;
