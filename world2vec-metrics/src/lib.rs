use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct RunMetrics {
    // Discovery
    pub total_chunks_listed: AtomicUsize,
    pub total_chunks_inspected: AtomicUsize,
    pub total_chunks_skipped: AtomicUsize,
    pub total_anchor_chunks: AtomicUsize,
    pub total_filled_chunks: AtomicUsize,

    // Extraction
    pub total_layers_extracted: AtomicUsize,
    pub total_blocks_emitted: AtomicUsize,
    pub max_layer_blocks: AtomicUsize,

    // Stage timings
    pub total_scan_time_us: AtomicU64,
    pub total_fill_time_us: AtomicU64,
    pub total_surface_time_us: AtomicU64,
    pub total_extract_time_us: AtomicU64,
    pub total_write_time_us: AtomicU64,

    // Session
    pub start_time: Option<Instant>,
    pub config_summary: String,
}

impl RunMetrics {
    pub fn new(config_summary: String) -> Self {
        Self {
            start_time: Some(Instant::now()),
            config_summary,
            ..Default::default()
        }
    }

    pub fn record_listed(&self, chunks: usize) {
        self.total_chunks_listed.fetch_add(chunks, Ordering::Relaxed);
    }

    pub fn record_inspected(&self) {
        self.total_chunks_inspected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.total_chunks_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_anchor(&self) {
        self.total_anchor_chunks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filled(&self) {
        self.total_filled_chunks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_layer(&self, blocks: usize) {
        self.total_layers_extracted.fetch_add(1, Ordering::Relaxed);
        self.total_blocks_emitted.fetch_add(blocks, Ordering::Relaxed);
        self.max_layer_blocks.fetch_max(blocks, Ordering::Relaxed);
    }

    pub fn record_scan(&self, duration: Duration) {
        self.total_scan_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_fill(&self, duration: Duration) {
        self.total_fill_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_surface(&self, duration: Duration) {
        self.total_surface_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_extract(&self, duration: Duration) {
        self.total_extract_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_write(&self, duration: Duration) {
        self.total_write_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn generate_report(&self) -> String {
        let uptime = self.start_time.unwrap_or_else(Instant::now).elapsed();
        let ms = |counter: &AtomicU64| counter.load(Ordering::Relaxed) as f64 / 1000.0;

        let listed = self.total_chunks_listed.load(Ordering::Relaxed);
        let inspected = self.total_chunks_inspected.load(Ordering::Relaxed);
        let skipped = self.total_chunks_skipped.load(Ordering::Relaxed);
        let skip_rate = if listed > 0 { (skipped as f64 / listed as f64) * 100.0 } else { 0.0 };

        let anchors = self.total_anchor_chunks.load(Ordering::Relaxed);
        let filled = self.total_filled_chunks.load(Ordering::Relaxed);

        let layers = self.total_layers_extracted.load(Ordering::Relaxed);
        let blocks = self.total_blocks_emitted.load(Ordering::Relaxed);
        let max_layer = self.max_layer_blocks.load(Ordering::Relaxed);
        let avg_layer = if layers > 0 { blocks as f64 / layers as f64 } else { 0.0 };

        format!(
            "world2vec Run Report\n\
             ====================\n\
             Configuration: {}\n\
             Session Duration: {:.2?}\n\n\
             [Discovery]\n\
             Chunks Listed: {}\n\
             Chunks Inspected: {}\n\
             Chunks Skipped: {} ({:.1}%)\n\
             Anchor Chunks: {}\n\
             Filled Chunks: {}\n\
             Scan Time: {:.2} ms\n\
             Fill Time: {:.2} ms\n\n\
             [Extraction]\n\
             Surface Time: {:.2} ms\n\
             Layers: {}\n\
             Blocks Emitted: {}\n\
             Avg Blocks/Layer: {:.1}\n\
             Max Blocks/Layer: {}\n\
             Extract Time: {:.2} ms\n\n\
             [Output]\n\
             Write Time: {:.2} ms\n",
            self.config_summary,
            uptime,
            listed, inspected, skipped, skip_rate,
            anchors, filled,
            ms(&self.total_scan_time_us), ms(&self.total_fill_time_us),
            ms(&self.total_surface_time_us),
            layers, blocks, avg_layer, max_layer,
            ms(&self.total_extract_time_us),
            ms(&self.total_write_time_us),
        )
    }
}
