// stats.rs — 帧计时与 FPS 统计（只属于窗口驱动层）

use std::time::{Duration, Instant};

pub struct FrameStats {
    pub count: u64,
    pub last_pass: Duration,
    pub fps: f32,
    window_start: Instant,
    window_frames: u32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            last_pass: Duration::ZERO,
            fps: 0.0,
            window_start: Instant::now(),
            window_frames: 0,
        }
    }

    /// Record one finished pass; FPS is refreshed about once per second.
    pub fn record(&mut self, pass: Duration, now: Instant) {
        self.count += 1;
        self.last_pass = pass;
        self.window_frames += 1;
        let elapsed = now.duration_since(self.window_start).as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.window_frames as f32 / elapsed;
            self.window_frames = 0;
            self.window_start = now;
        }
    }

    /// `"<count>: <w> x <h>: HH:MM:SS.mmm"`
    pub fn line(&self, width: u32, height: u32) -> String {
        format!("{}: {} x {}: {}", self.count, width, height, format_duration(self.last_pass))
    }
}

pub fn format_duration(d: Duration) -> String {
    let millis = d.as_millis();
    let secs = millis / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        (secs / 3600) % 24,
        (secs / 60) % 60,
        secs % 60,
        millis % 1000
    )
}
