use std::collections::BTreeMap;
use std::time::Instant;

/// Timed stages of per-frame work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Detect,
    Smooth,
    Present,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Detect => "detect",
            Stage::Smooth => "smooth",
            Stage::Present => "present",
        }
    }
}

/// Observer for frame processing runs.
///
/// Keeps the processor free of any particular output mechanism; the CLI
/// reports to stdout, tests stay silent.
pub trait PipelineLogger: Send {
    /// A frame reached the display surface. `total` is unknown for live sources.
    fn progress(&mut self, presented: usize, total: Option<usize>);

    fn timing(&mut self, stage: Stage, duration_ms: f64);

    /// Number of face regions composited into one frame.
    fn regions(&mut self, count: usize);

    /// A frame was discarded because the worker was still busy.
    fn dropped(&mut self, frame_index: usize);

    fn summary(&self) {}
}

pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _presented: usize, _total: Option<usize>) {}
    fn timing(&mut self, _stage: Stage, _duration_ms: f64) {}
    fn regions(&mut self, _count: usize) {}
    fn dropped(&mut self, _frame_index: usize) {}
}

/// Collects stage timings, region counts and drops, and logs a summary
/// at the end of the run. Progress lines are throttled to every
/// `throttle_frames` presented frames.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<Stage, Vec<f64>>,
    region_counts: Vec<usize>,
    dropped_frames: Vec<usize>,
    presented: usize,
    start_time: Instant,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            region_counts: Vec::new(),
            dropped_frames: Vec::new(),
            presented: 0,
            start_time: Instant::now(),
        }
    }

    pub fn timings_for(&self, stage: Stage) -> Option<&[f64]> {
        self.timings.get(&stage).map(|v| v.as_slice())
    }

    pub fn dropped_frames(&self) -> &[usize] {
        &self.dropped_frames
    }

    /// Formatted end-of-run report, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.presented == 0 && self.timings.is_empty() && self.dropped_frames.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Smoothing summary ({} frames presented, {:.1}s total):",
            self.presented,
            elapsed_ms / 1000.0
        )];

        for (stage, durations) in &self.timings {
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = mean(durations);
            lines.push(format!(
                "  {:8}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms",
                stage.name()
            ));
        }

        if !self.region_counts.is_empty() {
            let counts: Vec<f64> = self.region_counts.iter().map(|&c| c as f64).collect();
            let max = self.region_counts.iter().max().copied().unwrap_or(0);
            lines.push(format!("  regions: avg {:.1}  max {max}", mean(&counts)));
        }

        lines.push(format!("  dropped_frames: {}", self.dropped_frames.len()));

        if self.presented > 0 && elapsed_ms > 0.0 {
            let fps = self.presented as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, presented: usize, total: Option<usize>) {
        self.presented = presented;
        let on_boundary = presented % self.throttle_frames == 0;
        match total {
            Some(total) if total > 0 && (on_boundary || presented == total) => {
                let pct = presented as f64 / total as f64 * 100.0;
                log::info!("Smoothing: {presented}/{total} frames ({pct:.1}%)");
            }
            None if on_boundary => log::info!("Smoothing: {presented} frames"),
            _ => {}
        }
    }

    fn timing(&mut self, stage: Stage, duration_ms: f64) {
        self.timings.entry(stage).or_default().push(duration_ms);
    }

    fn regions(&mut self, count: usize) {
        self.region_counts.push(count);
    }

    fn dropped(&mut self, frame_index: usize) {
        log::debug!("Dropped frame {frame_index}: worker busy");
        self.dropped_frames.push(frame_index);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
