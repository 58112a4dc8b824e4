use std::time::Instant;

/// Bytes in one mebibyte; rates are reported in MiB/s and labelled "MB/s".
pub const MIB: f64 = 1024.0 * 1024.0;

/// Cumulative byte counters for all network interfaces combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Bytes transmitted since boot.
    pub bytes_sent: u64,
    /// Bytes received since boot.
    pub bytes_recv: u64,
    /// When the counters were read.
    pub taken_at: Instant,
}

impl CounterSnapshot {
    pub fn new(bytes_sent: u64, bytes_recv: u64, taken_at: Instant) -> Self {
        Self {
            bytes_sent,
            bytes_recv,
            taken_at,
        }
    }
}

/// One derived throughput sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    /// Seconds since the sampler started.
    pub elapsed_secs: f64,
    /// Transmit rate in MiB/s.
    pub sent_mbps: f64,
    /// Receive rate in MiB/s.
    pub recv_mbps: f64,
}

impl RatePoint {
    /// Derive a point from two consecutive counter readings taken
    /// `interval_secs` apart.
    ///
    /// Counter deltas use wrapping subtraction, so a counter reset yields a
    /// single huge outlier instead of an underflow panic.
    pub fn between(
        previous: &CounterSnapshot,
        current: &CounterSnapshot,
        elapsed_secs: f64,
        interval_secs: f64,
    ) -> Self {
        Self {
            elapsed_secs,
            sent_mbps: rate_mbps(previous.bytes_sent, current.bytes_sent, interval_secs),
            recv_mbps: rate_mbps(previous.bytes_recv, current.bytes_recv, interval_secs),
        }
    }
}

/// `(current - previous) / (MiB * interval_secs)` with u64 wraparound.
#[inline]
pub fn rate_mbps(previous: u64, current: u64, interval_secs: f64) -> f64 {
    current.wrapping_sub(previous) as f64 / (MIB * interval_secs)
}
