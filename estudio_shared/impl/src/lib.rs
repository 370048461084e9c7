pub mod id;
pub mod ratelimit;
pub mod time;
