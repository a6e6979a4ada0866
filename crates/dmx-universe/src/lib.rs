//! The single authoritative universe buffer and its follower mirror.
//!
//! Writers serialize through one lock (`staged`); readers take a wait-free
//! snapshot off an `ArcSwap`, so a sender never blocks behind a writer and
//! never observes a half-applied batch.

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use dmx_model::{channel_index, ChannelNumber, FollowerMap, UNIVERSE_SIZE};

pub type Frame = [u8; UNIVERSE_SIZE];

pub struct UniverseBuffer {
	staged: Mutex<Frame>,
	published: ArcSwap<Frame>,
	followers: Mutex<FollowerMap>,
}

impl Default for UniverseBuffer {
	fn default() -> Self {
		Self::new()
	}
}

impl UniverseBuffer {
	#[must_use]
	pub fn new() -> Self {
		Self {
			staged: Mutex::new([0u8; UNIVERSE_SIZE]),
			published: ArcSwap::from_pointee([0u8; UNIVERSE_SIZE]),
			followers: Mutex::new(FollowerMap::default()),
		}
	}

	pub fn set_follower_map(&self, map: FollowerMap) {
		*self.followers.lock().expect("follower map lock poisoned") = map;
	}

	/// Set one channel, applying follower mirroring in the same visibility
	/// step.
	pub fn write(&self, channel: ChannelNumber, value: u8) {
		self.write_many([(channel, value)]);
	}

	/// Apply a batch atomically: the published snapshot either reflects all
	/// of `writes` (plus their mirrored followers) or none of them.
	pub fn write_many(&self, writes: impl IntoIterator<Item = (ChannelNumber, u8)>) {
		let followers = self.followers.lock().expect("follower map lock poisoned");
		let mut staged = self.staged.lock().expect("universe lock poisoned");

		for (channel, value) in writes {
			let Some(idx) = channel_index(channel) else { continue };
			staged[idx] = value;
			if let Some(mirrored) = followers.followers_of(channel) {
				for &follower in mirrored {
					if let Some(follower_idx) = channel_index(follower) {
						staged[follower_idx] = value;
					}
				}
			}
		}

		self.published.store(Arc::new(*staged));
	}

	/// Zero all 512 channels. Two consecutive calls are indistinguishable
	/// from one.
	pub fn blackout(&self) {
		let mut staged = self.staged.lock().expect("universe lock poisoned");
		staged.fill(0);
		self.published.store(Arc::new(*staged));
	}

	/// A consistent, wait-free copy of the current universe state.
	#[must_use]
	pub fn snapshot(&self) -> Frame {
		*self.published.load_full()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn write_updates_single_channel() {
		let buf = UniverseBuffer::new();
		buf.write(6, 255);
		let snap = buf.snapshot();
		assert_eq!(snap[5], 255);
		assert_eq!(snap[0], 0);
	}

	#[test]
	fn write_many_is_visible_as_one_batch() {
		let buf = UniverseBuffer::new();
		buf.write_many([(1, 10), (2, 20), (3, 30)]);
		let snap = buf.snapshot();
		assert_eq!(&snap[0..3], &[10, 20, 30]);
	}

	#[test]
	fn followers_mirror_single_hop_only() {
		let buf = UniverseBuffer::new();
		buf.set_follower_map(FollowerMap::from_pairs(true, [(1, 2), (2, 3)]));
		buf.write(1, 200);
		let snap = buf.snapshot();
		assert_eq!(snap[0], 200); // leader
		assert_eq!(snap[1], 200); // direct follower
		assert_eq!(snap[2], 0); // follower-of-follower is untouched
	}

	#[test]
	fn disabled_follower_map_does_not_mirror() {
		let buf = UniverseBuffer::new();
		buf.set_follower_map(FollowerMap::from_pairs(false, [(1, 2)]));
		buf.write(1, 200);
		assert_eq!(buf.snapshot()[1], 0);
	}

	#[test]
	fn blackout_is_idempotent() {
		let buf = UniverseBuffer::new();
		buf.write_many([(1, 10), (2, 20)]);
		buf.blackout();
		let first = buf.snapshot();
		buf.blackout();
		let second = buf.snapshot();
		assert_eq!(first, second);
		assert!(first.iter().all(|&v| v == 0));
	}

	#[test]
	fn out_of_range_channel_is_ignored() {
		let buf = UniverseBuffer::new();
		buf.write(0, 100);
		buf.write(513, 100);
		assert!(buf.snapshot().iter().all(|&v| v == 0));
	}
}
