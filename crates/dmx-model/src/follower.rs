use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::channel::ChannelNumber;

/// Leader channel -> set of channels that mirror it. One hop only:
/// followers are never themselves re-mirrored, and a channel can never
/// follow itself (filtered out at construction).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FollowerMap {
	pub enabled: bool,
	map: HashMap<ChannelNumber, HashSet<ChannelNumber>>,
}

impl FollowerMap {
	#[must_use]
	pub fn new(enabled: bool) -> Self {
		Self { enabled, map: HashMap::new() }
	}

	/// Register `follower` to mirror `leader`. Self-references are dropped
	/// silently, per the configuration-time filtering invariant.
	pub fn add(&mut self, leader: ChannelNumber, follower: ChannelNumber) {
		if leader == follower {
			return;
		}
		self.map.entry(leader).or_default().insert(follower);
	}

	#[must_use]
	pub fn followers_of(&self, leader: ChannelNumber) -> Option<&HashSet<ChannelNumber>> {
		if !self.enabled {
			return None;
		}
		self.map.get(&leader).filter(|f| !f.is_empty())
	}

	pub fn from_pairs(enabled: bool, pairs: impl IntoIterator<Item = (ChannelNumber, ChannelNumber)>) -> Self {
		let mut me = Self::new(enabled);
		for (leader, follower) in pairs {
			me.add(leader, follower);
		}
		me
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn filters_self_reference() {
		let mut map = FollowerMap::new(true);
		map.add(5, 5);
		assert!(map.followers_of(5).is_none());
	}

	#[test]
	fn disabled_map_yields_no_followers() {
		let map = FollowerMap::from_pairs(false, [(1, 2)]);
		assert!(map.followers_of(1).is_none());
	}

	#[test]
	fn returns_registered_followers() {
		let map = FollowerMap::from_pairs(true, [(1, 2), (1, 3)]);
		let followers = map.followers_of(1).unwrap();
		assert!(followers.contains(&2));
		assert!(followers.contains(&3));
	}
}
