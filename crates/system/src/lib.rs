pub mod counters;
pub mod sampler;

pub use counters::{CounterSource, SysinfoCounters};
pub use sampler::{spawn_sampler, RateSampler};
