use netchart_core::{CounterSnapshot, NetChartError, Result};
use std::time::Instant;
use sysinfo::Networks;

/// Anything that can report cumulative network byte counters.
///
/// The sampler pulls from this once at startup and once per tick.
pub trait CounterSource: Send {
    /// Read the current totals for all interfaces combined.
    fn fetch(&mut self) -> Result<CounterSnapshot>;
}

/// Host counters read through [`sysinfo`], summed over every interface.
pub struct SysinfoCounters {
    networks: Networks,
}

impl SysinfoCounters {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl Default for SysinfoCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterSource for SysinfoCounters {
    fn fetch(&mut self) -> Result<CounterSnapshot> {
        self.networks.refresh(false); // false = keep existing interfaces list
        let taken_at = Instant::now();

        if self.networks.iter().next().is_none() {
            return Err(NetChartError::Counter("no network interfaces reported".into()));
        }

        // `total_*` are cumulative since boot, unlike `received()` /
        // `transmitted()` which only cover the last refresh.
        let bytes_recv = self
            .networks
            .iter()
            .fold(0u64, |acc, (_, d)| acc.wrapping_add(d.total_received()));
        let bytes_sent = self
            .networks
            .iter()
            .fold(0u64, |acc, (_, d)| acc.wrapping_add(d.total_transmitted()));

        Ok(CounterSnapshot::new(bytes_sent, bytes_recv, taken_at))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_counters_do_not_go_backwards() {
        let mut counters = SysinfoCounters::new();
        // Containers without a network namespace report no interfaces.
        let Ok(first) = counters.fetch() else { return };
        let second = counters.fetch().unwrap();

        assert!(second.bytes_sent >= first.bytes_sent);
        assert!(second.bytes_recv >= first.bytes_recv);
        assert!(second.taken_at >= first.taken_at);
    }
}
