use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_processor::{
    FrameProcessor, OverloadPolicy, ProcessingStats, ProcessorConfig,
};
use crate::pipeline::frame_smoothing_pipeline::FrameSmoothingPipeline;
use crate::pipeline::pipeline_logger::{PipelineLogger, Stage};
use crate::pipeline::smoothing_config::SmoothingConfig;
use crate::shared::frame::Frame;
use crate::video::domain::display_surface::DisplaySurface;
use crate::video::domain::frame_source::FrameSource;

const DEFAULT_CHANNEL_CAPACITY: usize = 4;

/// A smoothed frame on its way to the presenting thread.
struct ComposedFrame {
    frame: Frame,
    regions: usize,
    detect_ms: f64,
    smooth_ms: f64,
}

#[derive(Default)]
struct SourceReport {
    failed: usize,
    dropped: Vec<usize>,
}

/// Runs detection and smoothing off the presenting thread.
///
/// Layout: `source → worker [detect + smooth] → caller [present]`
///
/// The source thread never waits on the worker under
/// [`OverloadPolicy::DropNewest`]; frames arriving while the queue is full
/// are discarded and reported to the logger.
pub struct ThreadedFrameProcessor {
    channel_capacity: usize,
}

impl ThreadedFrameProcessor {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            channel_capacity: channel_capacity.max(1),
        }
    }
}

impl Default for ThreadedFrameProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProcessor for ThreadedFrameProcessor {
    fn run(
        &self,
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        pipeline: FrameSmoothingPipeline,
        surface: &mut dyn DisplaySurface,
        config: ProcessorConfig,
        logger: &mut dyn PipelineLogger,
    ) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
        let total = source.frame_count();
        let cap = self.channel_capacity;

        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Frame>(cap);
        let (composed_tx, composed_rx) = crossbeam_channel::bounded::<ComposedFrame>(cap);

        let source_handle = spawn_source(source, frame_tx, config.overload, config.stop.clone());
        let worker_handle = spawn_worker(
            detector,
            pipeline,
            config.smoothing,
            frame_rx,
            composed_tx,
            config.stop.clone(),
        );

        let (presented, present_error) =
            run_present_loop(composed_rx, surface, total, &config.stop, logger);

        join_threads(source_handle, worker_handle, presented, present_error, logger)
    }
}

fn spawn_source(
    mut source: Box<dyn FrameSource>,
    frame_tx: Sender<Frame>,
    overload: OverloadPolicy,
    stop: Arc<AtomicBool>,
) -> JoinHandle<SourceReport> {
    std::thread::spawn(move || {
        let mut report = SourceReport::default();
        for frame_result in source.frames() {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let frame = match frame_result {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("Skipping unreadable frame: {e}");
                    report.failed += 1;
                    continue;
                }
            };

            let delivered = match overload {
                OverloadPolicy::Block => frame_tx.send(frame).is_ok(),
                OverloadPolicy::DropNewest => match frame_tx.try_send(frame) {
                    Ok(()) => true,
                    Err(TrySendError::Full(frame)) => {
                        report.dropped.push(frame.index());
                        true
                    }
                    Err(TrySendError::Disconnected(_)) => false,
                },
            };
            if !delivered {
                break;
            }
        }
        report
    })
}

fn spawn_worker(
    mut detector: Box<dyn FaceDetector>,
    pipeline: FrameSmoothingPipeline,
    smoothing: SmoothingConfig,
    frame_rx: Receiver<Frame>,
    composed_tx: Sender<ComposedFrame>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<usize> {
    std::thread::spawn(move || {
        let mut failed = 0;
        for frame in frame_rx {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            let started = Instant::now();
            let regions = match detector.detect(&frame) {
                Ok(regions) => regions,
                Err(e) => {
                    log::warn!("Frame {}: detection failed, passing through: {e}", frame.index());
                    Vec::new()
                }
            };
            let detect_ms = started.elapsed().as_secs_f64() * 1000.0;

            let started = Instant::now();
            let composed = match pipeline.process(&frame, &regions, &smoothing) {
                Ok(composed) => composed,
                Err(e) => {
                    log::warn!("Dropping frame: {e}");
                    failed += 1;
                    continue;
                }
            };
            let smooth_ms = started.elapsed().as_secs_f64() * 1000.0;

            let message = ComposedFrame {
                frame: composed,
                regions: regions.len(),
                detect_ms,
                smooth_ms,
            };
            if composed_tx.send(message).is_err() {
                break;
            }
        }
        failed
    })
}

/// Presents composed frames on the calling thread until the worker is done,
/// the stop flag is raised, or the surface fails.
fn run_present_loop(
    composed_rx: Receiver<ComposedFrame>,
    surface: &mut dyn DisplaySurface,
    total: Option<usize>,
    stop: &AtomicBool,
    logger: &mut dyn PipelineLogger,
) -> (usize, Option<Box<dyn std::error::Error>>) {
    let mut presented = 0;

    for composed in composed_rx {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        logger.timing(Stage::Detect, composed.detect_ms);
        logger.timing(Stage::Smooth, composed.smooth_ms);
        logger.regions(composed.regions);

        let started = Instant::now();
        if let Err(e) = surface.present(&composed.frame) {
            return (presented, Some(e));
        }
        logger.timing(Stage::Present, started.elapsed().as_secs_f64() * 1000.0);

        presented += 1;
        logger.progress(presented, total);
    }

    (presented, None)
}

/// Joins the source and worker threads and coalesces the first error.
fn join_threads(
    source_handle: JoinHandle<SourceReport>,
    worker_handle: JoinHandle<usize>,
    presented: usize,
    mut first_error: Option<Box<dyn std::error::Error>>,
    logger: &mut dyn PipelineLogger,
) -> Result<ProcessingStats, Box<dyn std::error::Error>> {
    fn set_if_none(slot: &mut Option<Box<dyn std::error::Error>>, err: Box<dyn std::error::Error>) {
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    let mut stats = ProcessingStats {
        presented,
        ..Default::default()
    };

    match source_handle.join() {
        Ok(report) => {
            for &index in &report.dropped {
                logger.dropped(index);
            }
            stats.dropped = report.dropped.len();
            stats.failed += report.failed;
        }
        Err(_) => set_if_none(&mut first_error, "Source thread panicked".into()),
    }

    match worker_handle.join() {
        Ok(failed) => stats.failed += failed,
        Err(_) => set_if_none(&mut first_error, "Worker thread panicked".into()),
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(stats),
    }
}
