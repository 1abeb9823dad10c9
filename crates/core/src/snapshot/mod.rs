//! Per-tick input snapshots and single-writer publishing
//!
//! The control tick reads two inputs produced by other periodic tasks:
//! decoded RC channel pulses and fused attitude/navigation data. Producers
//! run at their own cadences, so raw shared variables could be observed
//! mid-update. [`SnapshotBuffer`] gives each producer a publish-by-swap
//! triple buffer: writer and reader each own a slot and exchange them
//! through an atomic middle slot, so the reader always copies from a slot
//! the writer cannot reach. One `read()` per tick guarantees the whole
//! tick sees a single consistent snapshot.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Number of raw RC channels carried per frame
pub const RC_CHANNEL_COUNT: usize = 8;

/// Decoded RC receiver frame, one pulse width per channel
///
/// Values are in microsecond-like units, nominal range 1000-2000 with
/// center 1500. Which channel drives which axis is configuration-defined
/// (see [`crate::rc::ChannelMap`]), not fixed by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub channels: [u16; RC_CHANNEL_COUNT],
}

impl Default for ChannelSnapshot {
    fn default() -> Self {
        Self {
            channels: [crate::servo::PULSE_CENTER_US; RC_CHANNEL_COUNT],
        }
    }
}

impl ChannelSnapshot {
    /// Frame with every channel at the given pulse width
    pub const fn filled(pulse_us: u16) -> Self {
        Self {
            channels: [pulse_us; RC_CHANNEL_COUNT],
        }
    }
}

/// Fused sensor and navigation state for one tick
///
/// Produced by the external fusion pipeline. Angles are radians, rates
/// rad/s, heights meters, speed m/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    /// Roll angle (right wing down positive)
    pub roll: f32,
    /// Pitch angle (nose up positive)
    pub pitch: f32,
    /// Body roll rate
    pub p: f32,
    /// Body pitch rate
    pub q: f32,
    /// Body yaw rate
    pub r: f32,
    /// Barometric pressure height
    pub pressure_height: f32,
    /// GPS course over ground, radians
    pub gps_heading: f32,
    /// GPS ground speed, m/s
    pub gps_speed: f32,
    /// Navigation target heading, radians
    pub desired_heading: f32,
}

/// Fresh-data flag carried in the high bit of `middle`
const DIRTY: usize = 0b100;
const INDEX_MASK: usize = 0b011;

/// Single-writer / single-reader published snapshot
///
/// Triple buffer: at any moment one slot belongs to the writer, one to
/// the reader, and one sits in the shared middle. `publish` fills the
/// writer's slot and swaps it into the middle; `read` swaps its own slot
/// for the middle when fresh data is flagged, then copies from the slot
/// it now owns. Slot exchange only ever goes through the atomic `middle`
/// swap, so the writer can never select the slot the reader is copying,
/// no matter how many publishes land during one read.
pub struct SnapshotBuffer<T: Copy> {
    slots: [UnsafeCell<T>; 3],
    /// Middle slot index, `DIRTY` set when it holds unread data
    middle: AtomicUsize,
    /// Writer-owned slot index, touched only by the producer
    write_idx: AtomicUsize,
    /// Reader-owned slot index, touched only by the consumer
    read_idx: AtomicUsize,
}

// One producer task, one consumer task; slot handoff is via `middle`.
unsafe impl<T: Copy + Send> Sync for SnapshotBuffer<T> {}

impl<T: Copy + Default> Default for SnapshotBuffer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> SnapshotBuffer<T> {
    /// Create a buffer with every slot holding `initial`
    pub const fn new(initial: T) -> Self {
        Self {
            slots: [
                UnsafeCell::new(initial),
                UnsafeCell::new(initial),
                UnsafeCell::new(initial),
            ],
            middle: AtomicUsize::new(1),
            write_idx: AtomicUsize::new(0),
            read_idx: AtomicUsize::new(2),
        }
    }

    /// Publish a new snapshot (producer side only)
    pub fn publish(&self, value: T) {
        let w = self.write_idx.load(Ordering::Relaxed);
        // Safety: slot `w` is writer-owned until the swap below.
        unsafe {
            *self.slots[w].get() = value;
        }
        let prev = self.middle.swap(w | DIRTY, Ordering::AcqRel);
        self.write_idx.store(prev & INDEX_MASK, Ordering::Relaxed);
    }

    /// Copy out the freshest published snapshot (consumer side)
    pub fn read(&self) -> T {
        if self.middle.load(Ordering::Relaxed) & DIRTY != 0 {
            let r = self.read_idx.load(Ordering::Relaxed);
            let prev = self.middle.swap(r, Ordering::AcqRel);
            self.read_idx.store(prev & INDEX_MASK, Ordering::Relaxed);
        }
        let r = self.read_idx.load(Ordering::Relaxed);
        // Safety: slot `r` is reader-owned until the next swap above.
        unsafe { *self.slots[r].get() }
    }
}
