use crate::counters::CounterSource;
use netchart_config::{SamplerConfig, TickErrorPolicy};
use netchart_core::{CounterSnapshot, RatePoint, Result, SeriesWriter};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

/// Turns successive cumulative readings into rate points.
///
/// Holds the sampler start time and the last good reading; every call to
/// [`RateSampler::advance`] consumes one new reading.
#[derive(Debug, Clone)]
pub struct RateSampler {
    start:         Instant,
    previous:      CounterSnapshot,
    interval_secs: f64,
}

impl RateSampler {
    pub fn new(start: Instant, initial: CounterSnapshot, interval: Duration) -> Self {
        Self {
            start,
            previous: initial,
            interval_secs: interval.as_secs_f64(),
        }
    }

    /// Derive the point for `current` and make it the new baseline.
    ///
    /// The rate divides by the nominal interval, not the measured gap
    /// between readings.
    pub fn advance(&mut self, current: CounterSnapshot) -> RatePoint {
        let elapsed = current
            .taken_at
            .saturating_duration_since(self.start)
            .as_secs_f64();
        let point = RatePoint::between(&self.previous, &current, elapsed, self.interval_secs);
        self.previous = current;
        point
    }

    /// The reading the next point will be measured against.
    pub fn previous(&self) -> &CounterSnapshot {
        &self.previous
    }
}

/// Take the initial reading, then spawn a background Tokio task that samples
/// `source` every `config.interval_ms` and appends one point per tick.
///
/// An unreadable source at startup is returned as an error and nothing is
/// spawned. After that, read failures follow `config.on_tick_error`: `Skip`
/// logs and keeps the previous reading, `Abort` ends the task with the error.
/// The task otherwise runs until the runtime shuts down.
pub fn spawn_sampler<S>(
    mut source: S,
    mut writer: SeriesWriter,
    config: &SamplerConfig,
) -> Result<JoinHandle<Result<()>>>
where
    S: CounterSource + 'static,
{
    let interval = config.interval();
    let policy = config.on_tick_error;

    let start = Instant::now();
    let initial = source.fetch()?;
    info!(
        interval_ms = config.interval_ms,
        sent_bytes = initial.bytes_sent,
        recv_bytes = initial.bytes_recv,
        "Sampling network counters"
    );

    let mut sampler = RateSampler::new(start, initial, interval);

    Ok(tokio::spawn(async move {
        // First point lands one full interval after the initial reading.
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let current = match source.fetch() {
                Ok(current) => current,
                Err(e) => match policy {
                    TickErrorPolicy::Skip => {
                        warn!("Counter read failed; skipping this tick: {e}");
                        continue;
                    }
                    TickErrorPolicy::Abort => {
                        error!("Counter read failed; stopping sampler: {e}");
                        return Err(e);
                    }
                },
            };

            let point = sampler.advance(current);
            match writer.append(point) {
                Ok(()) => trace!(
                    t = point.elapsed_secs,
                    sent = point.sent_mbps,
                    recv = point.recv_mbps,
                    "sample appended"
                ),
                Err(e) => warn!("Dropped sample: {e}"),
            }
            debug!(points = writer.len(), "tick complete");
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::scripted::ScriptedCounters;
    use netchart_core::{NetChartError, MIB};

    const MB: u64 = 1024 * 1024;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    fn config(policy: TickErrorPolicy) -> SamplerConfig {
        SamplerConfig {
            interval_ms:   1000,
            history_limit: None,
            on_tick_error: policy,
        }
    }

    #[test]
    fn advance_computes_rates_and_moves_baseline() {
        let t0 = Instant::now();
        let mut sampler = RateSampler::new(
            t0,
            CounterSnapshot::new(0, 0, t0),
            Duration::from_secs(1),
        );

        let p = sampler.advance(CounterSnapshot::new(MB, 2 * MB, t0 + Duration::from_secs(1)));
        assert!(approx(p.elapsed_secs, 1.0));
        assert!(approx(p.sent_mbps, 1.0));
        assert!(approx(p.recv_mbps, 2.0));
        assert_eq!(sampler.previous().bytes_recv, 2 * MB);
    }

    #[test]
    fn counter_reset_gives_one_outlier_then_recovers() {
        let t0 = Instant::now();
        let at = |s: u64| t0 + Duration::from_secs(s);
        let mut writer = SeriesWriter::new(None);
        let mut sampler = RateSampler::new(
            t0,
            CounterSnapshot::new(10 * MB, 10 * MB, t0),
            Duration::from_secs(1),
        );

        for reading in [
            CounterSnapshot::new(12 * MB, 11 * MB, at(1)),
            CounterSnapshot::new(MB, MB, at(2)), // interface reset
            CounterSnapshot::new(2 * MB, 3 * MB, at(3)),
        ] {
            writer.append(sampler.advance(reading)).unwrap();
        }

        let snap = writer.reader().snapshot();
        assert_eq!(snap.len(), 3);
        assert!(approx(snap.sent[0], 2.0));
        assert!(snap.sent[1] > 1e12 / MIB);
        assert!(snap.recv[1] > 1e12 / MIB);
        assert!(approx(snap.sent[2], 1.0));
        assert!(approx(snap.recv[2], 2.0));
    }

    #[test]
    fn uses_configured_interval() {
        let t0 = Instant::now();
        let mut sampler = RateSampler::new(
            t0,
            CounterSnapshot::new(0, 0, t0),
            Duration::from_millis(500),
        );
        let p = sampler.advance(CounterSnapshot::new(MB, MB, t0 + Duration::from_millis(500)));
        assert!(approx(p.sent_mbps, 2.0));
        assert!(approx(p.elapsed_secs, 0.5));
    }

    #[tokio::test(start_paused = true)]
    async fn appends_one_point_per_tick() {
        let source = ScriptedCounters::new(
            vec![
                Some((0, 0)),
                Some((MB, 2 * MB)),
                Some((3 * MB, 4 * MB)),
                Some((6 * MB, 6 * MB)),
            ],
            Duration::from_secs(1),
        );
        let writer = SeriesWriter::new(None);
        let reader = writer.reader();

        let _handle = spawn_sampler(source, writer, &config(TickErrorPolicy::Skip)).unwrap();
        assert!(reader.is_empty());

        time::sleep(Duration::from_millis(3500)).await;

        let snap = reader.snapshot();
        assert_eq!(snap.len(), 3);
        assert!(snap.is_aligned());
        assert!(snap.is_monotonic());
        assert!(approx(snap.time[0], 1.0));
        assert!(approx(snap.sent[0], 1.0));
        assert!(approx(snap.recv[0], 2.0));
        assert!(approx(snap.sent[1], 2.0));
        assert!(approx(snap.sent[2], 3.0));
        assert!(approx(snap.recv[2], 2.0));
    }

    #[tokio::test(start_paused = true)]
    async fn skip_policy_keeps_previous_reading() {
        let source = ScriptedCounters::new(
            vec![Some((0, 0)), Some((MB, MB)), None, Some((3 * MB, 2 * MB))],
            Duration::from_secs(1),
        );
        let writer = SeriesWriter::new(None);
        let reader = writer.reader();

        let handle = spawn_sampler(source, writer, &config(TickErrorPolicy::Skip)).unwrap();
        time::sleep(Duration::from_millis(3500)).await;

        let snap = reader.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(approx(snap.time[1], 3.0));
        assert!(approx(snap.sent[1], 2.0));
        assert!(approx(snap.recv[1], 1.0));
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn abort_policy_ends_the_task() {
        let source = ScriptedCounters::new(
            vec![Some((0, 0)), Some((MB, MB)), None],
            Duration::from_secs(1),
        );
        let writer = SeriesWriter::new(None);
        let reader = writer.reader();

        let handle = spawn_sampler(source, writer, &config(TickErrorPolicy::Abort)).unwrap();
        let result = handle.await.unwrap();

        assert!(matches!(result, Err(NetChartError::Counter(_))));
        assert_eq!(reader.len(), 1);
    }

    #[tokio::test]
    async fn startup_failure_is_fatal() {
        let source = ScriptedCounters::new(vec![None], Duration::from_secs(1));
        let result = spawn_sampler(source, SeriesWriter::new(None), &config(TickErrorPolicy::Skip));
        assert!(matches!(result, Err(NetChartError::Counter(_))));
    }
}
