//! Shared throughput history.
//!
//! The three parallel series live behind a single [`RwLock`], so a reader
//! either sees a point in all three or in none of them. Write access is
//! split off into [`SeriesWriter`], which is not `Clone`: the
//! sampler holds the only one. Any number of [`SeriesReader`]s can be handed
//! to request handlers.

use crate::{NetChartError, RatePoint, Result};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Series {
    time: VecDeque<f64>,
    sent: VecDeque<f64>,
    recv: VecDeque<f64>,
}

#[derive(Debug)]
struct Shared {
    series: RwLock<Series>,
    /// Maximum retained points; `None` keeps everything.
    history_limit: Option<usize>,
}

/// Exclusive append handle for the series store.
#[derive(Debug)]
pub struct SeriesWriter {
    shared: Arc<Shared>,
}

/// Read-only handle; cheap to clone.
#[derive(Debug, Clone)]
pub struct SeriesReader {
    shared: Arc<Shared>,
}

/// An index-aligned copy of the store at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesSnapshot {
    /// Seconds since sampler start, strictly increasing.
    pub time: Vec<f64>,
    /// Transmit rate in MiB/s.
    pub sent: Vec<f64>,
    /// Receive rate in MiB/s.
    pub recv: Vec<f64>,
}

impl SeriesWriter {
    /// Create an empty store. `history_limit = None` never evicts.
    pub fn new(history_limit: Option<usize>) -> Self {
        let series = Series::default();
        Self {
            shared: Arc::new(Shared {
                series: RwLock::new(series),
                history_limit: history_limit.map(|n| n.max(1)),
            }),
        }
    }

    /// A new read handle onto this store.
    pub fn reader(&self) -> SeriesReader {
        SeriesReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Append one point to all three series at once.
    ///
    /// Fails without modifying the store if `point.elapsed_secs` does not
    /// strictly follow the last stored time.
    pub fn append(&mut self, point: RatePoint) -> Result<()> {
        let mut series = self.shared.series.write();

        let last = series.time.back().copied();
        let ordered = point.elapsed_secs.is_finite()
            && last.map_or(true, |last| point.elapsed_secs > last);
        if !ordered {
            return Err(NetChartError::NonMonotonic {
                previous: last.unwrap_or(f64::NEG_INFINITY),
                next:     point.elapsed_secs,
            });
        }

        series.time.push_back(point.elapsed_secs);
        series.sent.push_back(point.sent_mbps);
        series.recv.push_back(point.recv_mbps);

        if let Some(limit) = self.shared.history_limit {
            while series.time.len() > limit {
                series.time.pop_front();
                series.sent.pop_front();
                series.recv.pop_front();
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.shared.series.read().time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeriesReader {
    /// Copy out the current contents. The read lock is held only for the copy.
    pub fn snapshot(&self) -> SeriesSnapshot {
        let series = self.shared.series.read();
        SeriesSnapshot {
            time: series.time.iter().copied().collect(),
            sent: series.sent.iter().copied().collect(),
            recv: series.recv.iter().copied().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.shared.series.read().time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// `true` when all three series have the same length.
    pub fn is_aligned(&self) -> bool {
        self.time.len() == self.sent.len() && self.time.len() == self.recv.len()
    }

    /// `true` when the time axis is strictly increasing.
    pub fn is_monotonic(&self) -> bool {
        self.time.windows(2).all(|w| w[0] < w[1])
    }

    /// Iterate `(time, sent)` pairs.
    pub fn sent_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.sent.iter().copied())
    }

    /// Iterate `(time, recv)` pairs.
    pub fn recv_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.recv.iter().copied())
    }
}
