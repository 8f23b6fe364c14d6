//! Opt-in wall-clock timing of pipeline stages.
//!
//! Samples are kept per thread and drained by [`collect_report`]. Nothing is
//! recorded unless [`set_timing_enabled`] turned collection on, either from
//! `--timing` or from `BETWEEN_TIMING`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

/// One step of the read → solve → aggregate → write pipeline.
///
/// Variants are declared in pipeline order, which is also report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Parse,
    BuildDense,
    BuildSparse,
    FloydWarshall,
    Johnson,
    Aggregate,
    Write,
}

impl Stage {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::BuildDense => "graph.dense",
            Self::BuildSparse => "graph.sparse",
            Self::FloydWarshall => "engine.floyd_warshall",
            Self::Johnson => "engine.johnson",
            Self::Aggregate => "aggregate",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-stage totals for one or more runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingReport {
    /// Stages that recorded at least one sample, in pipeline order.
    pub stages: Vec<StageTiming>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTiming {
    pub stage: Stage,
    pub total: Duration,
    /// Slowest single sample.
    pub max: Duration,
    pub count: usize,
}

thread_local! {
    static SAMPLES: RefCell<Vec<(Stage, Duration)>> = const { RefCell::new(Vec::new()) };
}

static TIMING_ENABLED: AtomicBool = AtomicBool::new(false);

/// True when `BETWEEN_TIMING` is `1`, `true`, `yes` or `on`
/// (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("BETWEEN_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(&value))
}

/// Turn collection on or off. Turning it off drops pending samples.
pub fn set_timing_enabled(enabled: bool) {
    TIMING_ENABLED.store(enabled, Ordering::Relaxed);
    if !enabled {
        clear_timings();
    }
}

#[must_use]
pub fn is_timing_enabled() -> bool {
    TIMING_ENABLED.load(Ordering::Relaxed)
}

pub fn clear_timings() {
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

/// Run `f`, recording its wall-clock time under `stage` when enabled.
pub fn timed<R>(stage: Stage, f: impl FnOnce() -> R) -> R {
    if !is_timing_enabled() {
        return f();
    }

    let started = Instant::now();
    let result = f();
    let elapsed = started.elapsed();
    SAMPLES.with(|samples| samples.borrow_mut().push((stage, elapsed)));
    result
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn collect_report() -> TimingReport {
    let samples = SAMPLES.with(|samples| std::mem::take(&mut *samples.borrow_mut()));

    let mut by_stage: BTreeMap<Stage, StageTiming> = BTreeMap::new();
    for (stage, elapsed) in samples {
        let entry = by_stage.entry(stage).or_insert(StageTiming {
            stage,
            total: Duration::ZERO,
            max: Duration::ZERO,
            count: 0,
        });
        entry.total += elapsed;
        entry.max = entry.max.max(elapsed);
        entry.count += 1;
    }

    TimingReport {
        stages: by_stage.into_values().collect(),
    }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum over every stage.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.stages.iter().map(|stage| stage.total).sum()
    }

    /// Share of [`TimingReport::total`] spent in `stage`, in percent.
    #[must_use]
    pub fn share(&self, stage: &StageTiming) -> f64 {
        let total = self.total();
        if total.is_zero() {
            return 0.0;
        }
        100.0 * stage.total.as_secs_f64() / total.as_secs_f64()
    }

    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let stages: Vec<_> = self
            .stages
            .iter()
            .map(|stage| {
                json!({
                    "stage": stage.stage.name(),
                    "count": stage.count,
                    "total_us": stage.total.as_micros(),
                    "max_us": stage.max.as_micros(),
                })
            })
            .collect();

        json!({ "total_us": self.total().as_micros(), "stages": stages })
    }

    /// Plain-text table for stderr.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.stages.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::from(
            "stage                    count      total        max  share\n\
             ----------------------------------------------------------\n",
        );
        for stage in &self.stages {
            out.push_str(&format!(
                "{:<24} {:>6} {:>10} {:>10} {:>5.1}%\n",
                stage.stage.name(),
                stage.count,
                format_duration(stage.total),
                format_duration(stage.max),
                self.share(stage),
            ));
        }
        out
    }
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        format!("{}.{:03}s", micros / 1_000_000, (micros % 1_000_000) / 1_000)
    } else if micros >= 1_000 {
        format!("{}.{:03}ms", micros / 1_000, micros % 1_000)
    } else {
        format!("{micros}us")
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the global switch; parallel tests toggling it would race.
    #[test]
    fn report_follows_pipeline_order_and_disabled_records_nothing() {
        set_timing_enabled(false);
        assert_eq!(timed(Stage::Parse, || 41 + 1), 42);
        assert!(collect_report().is_empty());

        set_timing_enabled(true);
        clear_timings();
        timed(Stage::Write, || ());
        timed(Stage::Aggregate, || ());
        timed(Stage::FloydWarshall, || ());
        timed(Stage::Aggregate, || ());
        timed(Stage::Parse, || ());
        let report = collect_report();
        set_timing_enabled(false);

        let stages: Vec<Stage> = report.stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![Stage::Parse, Stage::FloydWarshall, Stage::Aggregate, Stage::Write]
        );
        let aggregate = &report.stages[2];
        assert_eq!(aggregate.count, 2);
        assert!(aggregate.max <= aggregate.total);
        assert!(report.total() >= aggregate.total);

        assert!(report.display_table().contains("engine.floyd_warshall"));
        let json = report.to_json();
        assert_eq!(json["stages"][0]["stage"], "parse");
        assert_eq!(json["stages"][3]["stage"], "write");
    }

    #[test]
    fn shares_are_percentages_of_the_total() {
        let stage = |stage, millis| StageTiming {
            stage,
            total: Duration::from_millis(millis),
            max: Duration::from_millis(millis),
            count: 1,
        };
        let report = TimingReport {
            stages: vec![stage(Stage::Johnson, 30), stage(Stage::Aggregate, 10)],
        };
        assert_eq!(report.total(), Duration::from_millis(40));
        assert!((report.share(&report.stages[0]) - 75.0).abs() < 1e-9);
        assert!(report.display_table().contains("25.0%"));

        let idle = TimingReport {
            stages: vec![stage(Stage::Parse, 0)],
        };
        assert!(idle.share(&idle.stages[0]).abs() < f64::EPSILON);
    }

    #[test]
    fn truthy_values() {
        for value in ["1", "TRUE", " yes ", "On"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["0", "false", "", "nope"] {
            assert!(!is_truthy(value), "{value}");
        }
    }

    #[test]
    fn stage_names_and_durations_render() {
        assert_eq!(Stage::BuildSparse.to_string(), "graph.sparse");
        assert_eq!(format_duration(Duration::from_micros(15)), "15us");
        assert_eq!(format_duration(Duration::from_micros(2_500)), "2.500ms");
        assert_eq!(format_duration(Duration::from_millis(3_250)), "3.250s");
    }
}
