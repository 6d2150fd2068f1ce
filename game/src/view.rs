// src/view.rs

//! Turns camera movement into `moveView` requests and eviction lists.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use log::{debug, info};
use terrain::coords::{Coords, CHUNK_HEIGHT, CHUNK_WIDTH};
use terrain::extent::ViewExtent;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewConfig {
    /// Size of the visible box in cells, `[x, y, z]`.
    pub view_size: [f64; 3],
    /// How far ahead of the camera the box is centred.
    pub look_ahead: f64,
    /// Cells added around the view before a chunk is evicted.
    pub eviction_buffer: i32,
    /// Minimum delay between two `moveView` requests.
    pub throttle: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            view_size: [
                (CHUNK_WIDTH * 8) as f64,
                (CHUNK_HEIGHT * 2) as f64,
                (CHUNK_WIDTH * 8) as f64,
            ],
            look_ahead: (CHUNK_WIDTH * 4) as f64,
            eviction_buffer: CHUNK_WIDTH * 3,
            throttle: Duration::from_millis(400),
        }
    }
}

/// What the caller should do after a view change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewUpdate {
    /// Extent to send to the server as `moveView`, if any.
    pub send: Option<ViewExtent>,
    /// Keys of chunks that left the buffered view and the last sent extent,
    /// and can be dropped.
    pub evict: Vec<String>,
}

/// Tracks the camera's view extent.
///
/// Requests are throttled: the first change is sent right away, further
/// changes within the throttle interval are held back and the latest one goes
/// out on the next [`ViewTracker::observe`] or [`ViewTracker::flush`] after
/// the interval. The server therefore always ends up with the newest extent.
///
/// The server only sends each chunk of its copy of the view once, so chunks
/// inside the last sent extent are never evicted, even when the camera has
/// already moved on and the next request is still held back.
#[derive(Debug)]
pub struct ViewTracker {
    config: ViewConfig,
    current: ViewExtent,
    buffered: ViewExtent,
    last_sent: Option<ViewExtent>,
    last_sent_at: Option<Instant>,
    pending: Option<ViewExtent>,
}

impl ViewTracker {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            current: ViewExtent::EMPTY,
            buffered: ViewExtent::EMPTY,
            last_sent: None,
            last_sent_at: None,
            pending: None,
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The most recently observed extent.
    pub fn current(&self) -> ViewExtent {
        self.current
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The view box for a camera at `position` looking along `forward`.
    pub fn extent_for_camera(&self, position: [f64; 3], forward: [f64; 3]) -> ViewExtent {
        let length = forward.iter().map(|c| c * c).sum::<f64>().sqrt();
        let center = if length > f64::EPSILON {
            [0, 1, 2].map(|i| position[i] + forward[i] / length * self.config.look_ahead)
        } else {
            position
        };
        ViewExtent::around(center, self.config.view_size)
    }

    pub fn update_camera(&mut self, position: [f64; 3], forward: [f64; 3], now: Instant) -> ViewUpdate {
        let extent = self.extent_for_camera(position, forward);
        self.observe(extent, now)
    }

    pub fn observe(&mut self, extent: ViewExtent, now: Instant) -> ViewUpdate {
        let before = self.retained_extents();

        if extent != self.current {
            debug!("View moved to {:?}", extent);
            self.buffered = extent.with_buffer(self.config.eviction_buffer);
            self.current = extent;
        }

        let send = if self.last_sent == Some(extent) {
            self.pending = None;
            None
        } else {
            self.pending = Some(extent);
            self.send_if_due(now)
        };
        ViewUpdate {
            send,
            evict: self.evictions_since(before),
        }
    }

    /// Sends the held-back extent once the throttle interval has passed.
    pub fn flush(&mut self, now: Instant) -> ViewUpdate {
        let before = self.retained_extents();
        let send = self.send_if_due(now);
        ViewUpdate {
            send,
            evict: self.evictions_since(before),
        }
    }

    /// Whether the chunk based at `base` should stay cached: it is inside the
    /// buffered view, or inside the extent the server was last sent and so
    /// will not be sent again.
    pub fn retains(&self, base: Coords) -> bool {
        self.buffered.contains(base) || self.last_sent.is_some_and(|sent| sent.contains(base))
    }

    fn send_if_due(&mut self, now: Instant) -> Option<ViewExtent> {
        let ready = match self.last_sent_at {
            Some(at) => now.saturating_duration_since(at) >= self.config.throttle,
            None => true,
        };
        if !ready {
            return None;
        }
        let extent = self.pending.take()?;
        info!("Requesting view extent {:?}", extent);
        self.last_sent = Some(extent);
        self.last_sent_at = Some(now);
        Some(extent)
    }

    fn retained_extents(&self) -> [ViewExtent; 2] {
        [self.buffered, self.last_sent.unwrap_or(ViewExtent::EMPTY)]
    }

    fn evictions_since(&self, before: [ViewExtent; 2]) -> Vec<String> {
        if before == self.retained_extents() {
            return Vec::new();
        }
        let mut gone = BTreeSet::new();
        for extent in &before {
            for base in extent.chunks() {
                if !self.retains(base) {
                    gone.insert(base);
                }
            }
        }
        if !gone.is_empty() {
            debug!("Evicting {} chunks", gone.len());
        }
        gone.into_iter().map(|base| base.to_key()).collect()
    }
}
