//! Opt-in timing hooks for the plot pipeline.
//!
//! Timing is only collected when the `plot_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call compiles down to running the closure.
//!
//! # Usage
//!
//! ```ignore
//! use plot3d_engine::geom::{PlotMetrics, TimingBucket};
//!
//! let mut metrics = PlotMetrics::default();
//! metrics.begin();
//!
//! let mesh = metrics.time(TimingBucket::Sampling, || sample_grid(...));
//! let clipped = metrics.time(TimingBucket::Clipping, || clip_mesh_to_cube(&mesh));
//!
//! if let Some(report) = metrics.end() {
//!     println!("Sampling: {} ns", report.sampling_ns);
//! }
//! ```

/// Categories for timing the stages of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Function evaluation and graph/device conversion.
    Sampling,
    /// Grid face construction.
    Topology,
    /// Colormap lookups.
    Coloring,
    /// Overlay line tracing and cylinder generation.
    Strokes,
    /// Cube intersection and crop-face removal.
    Clipping,
    /// Axes planes, division strokes and label anchors.
    Decoration,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PlotTimingReport {
    pub sampling_ns: u64,
    pub topology_ns: u64,
    pub coloring_ns: u64,
    pub strokes_ns: u64,
    pub clipping_ns: u64,
    pub decoration_ns: u64,
}

impl PlotTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.sampling_ns
            .saturating_add(self.topology_ns)
            .saturating_add(self.coloring_ns)
            .saturating_add(self.strokes_ns)
            .saturating_add(self.clipping_ns)
            .saturating_add(self.decoration_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing plot stages.
///
/// Call [`begin`](Self::begin) to reset, wrap stages with
/// [`time`](Self::time), and read the report with [`end`](Self::end).
#[derive(Debug, Default)]
pub struct PlotMetrics {
    #[cfg(all(feature = "plot_metrics", not(target_arch = "wasm32")))]
    report: PlotTimingReport,
}

impl PlotMetrics {
    pub fn begin(&mut self) {
        #[cfg(all(feature = "plot_metrics", not(target_arch = "wasm32")))]
        {
            self.report = PlotTimingReport::default();
        }
    }

    /// Returns the accumulated report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<PlotTimingReport> {
        #[cfg(all(feature = "plot_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "plot_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "plot_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "plot_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "plot_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::Sampling => &mut self.report.sampling_ns,
            TimingBucket::Topology => &mut self.report.topology_ns,
            TimingBucket::Coloring => &mut self.report.coloring_ns,
            TimingBucket::Strokes => &mut self.report.strokes_ns,
            TimingBucket::Clipping => &mut self.report.clipping_ns,
            TimingBucket::Decoration => &mut self.report.decoration_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
