//! Training-data capture: save every n-th webcam frame of a hand sign into
//! `<output>/<letter>/<person>_<letter>_<index>.jpg`.

use clap::Parser;
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

/// Capture training frames for one hand-sign letter
#[derive(Parser, Debug)]
#[command(name = "frame-capture", version, about)]
pub struct CaptureArgs {
    /// Letter (class name) being recorded
    pub letter: String,

    /// Name put in front of every file
    #[arg(long, default_value = "user")]
    pub person: String,

    /// Save one frame out of every N
    #[arg(long, default_value_t = 10)]
    pub every: u32,

    /// Seconds to record
    #[arg(long, default_value_t = 3.0)]
    pub duration: f64,

    /// Dataset root
    #[arg(long, default_value = "./data")]
    pub output: PathBuf,

    /// Camera device
    #[arg(long, default_value = "/dev/video0")]
    pub device: String,

    /// Record without a preview window
    #[arg(long)]
    pub no_preview: bool,
}

impl CaptureArgs {
    pub fn letter_dir(&self) -> PathBuf {
        self.output.join(&self.letter)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration.max(0.0))
    }
}

/// Index in a name like `alice_A_17.jpg`.
pub fn frame_index(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".jpg")?;
    let (_, index) = stem.rsplit_once('_')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index.parse().ok()
}

/// First free index in `dir`: one past the highest existing index, or 0.
/// Creates `dir` when it is missing.
pub fn next_frame_index(dir: &Path) -> io::Result<u32> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(0);
    }
    let mut next = 0;
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        if let Some(index) = name.to_str().and_then(frame_index) {
            next = next.max(index.saturating_add(1));
        }
    }
    Ok(next)
}

pub fn frame_file_name(person: &str, letter: &str, index: u32) -> String {
    format!("{person}_{letter}_{index}.jpg")
}

/// Picks every n-th frame, starting with the first.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    every: u32,
    count: u64,
}

impl FrameSampler {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Count a frame; true when it should be kept.
    pub fn tick(&mut self) -> bool {
        let keep = self.count % self.every as u64 == 0;
        self.count += 1;
        keep
    }

    pub fn frames_seen(&self) -> u64 {
        self.count
    }
}
