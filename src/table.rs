//! Fixed-capacity double-hashing table with slot-sharing collisions.
//!
//! Every slot is empty, live or a tombstone. A live slot holds one or more keys
//! and the single value recorded when the slot first became live; a key that
//! collides with a live slot on its probe path joins that slot's key list and
//! shares its value instead of taking a slot of its own.
//!
//! Probing follows `(h1(k) + j * h2(k)) mod M` for `j = 0..M`. Since `M` need
//! not be prime the sequence may cycle before visiting every slot, so every
//! walk is bounded to `M` probes.

use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::Config;

/// Key list of a live slot. Most slots hold one or two keys.
pub(crate) type SlotKeys = SmallVec<[Key; 2]>;

#[derive(Clone, Debug, Default)]
pub(crate) enum Slot {
    /// Never held a key since construction or the last clear.
    #[default]
    Empty,
    Live(LiveSlot),
    /// Held keys once; probes continue past it, inserts may revive it.
    Tombstone,
}

#[derive(Clone, Debug)]
pub(crate) struct LiveSlot {
    /// Distinct keys in landing order, never empty.
    pub(crate) keys: SlotKeys,
    /// Frozen while the slot stays live.
    pub(crate) value: String,
}

impl LiveSlot {
    fn new(key: Key, value: String) -> Self {
        let mut keys = SlotKeys::new();
        keys.push(key);
        Self { keys, value }
    }
}

/// Where an insert landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insertion {
    /// The key made an empty slot or a tombstone live with its own value.
    Placed(usize),
    /// The key joined an existing live slot and shares its value.
    Shared(usize),
    /// The key was already stored in this slot; nothing changed.
    Duplicate(usize),
}

impl Insertion {
    /// Slot index the key lives in after the call.
    pub fn index(self) -> usize {
        match self {
            Insertion::Placed(i) | Insertion::Shared(i) | Insertion::Duplicate(i) => i,
        }
    }

    /// `true` unless the insert was a duplicate no-op.
    pub fn is_new(self) -> bool {
        !matches!(self, Insertion::Duplicate(_))
    }
}

/// Read-only view of a live slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotView<'a> {
    pub index: usize,
    pub keys: &'a [Key],
    pub value: &'a str,
}

/// Probe sequence of a key: at most `capacity` slot indices.
#[derive(Clone, Debug)]
pub struct Probe {
    next: usize,
    step: usize,
    capacity: usize,
    remaining: usize,
}

impl Probe {
    fn new(key: &Key, capacity: usize) -> Self {
        Self {
            next: key.primary_hash(capacity),
            step: key.step_hash(capacity),
            capacity,
            remaining: capacity,
        }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.next;
        self.next = (self.next + self.step) % self.capacity;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Probe {}

/// Fixed-capacity table mapping `DDLLDD` keys to string values.
///
/// ## Example
///
/// ```rust
/// use keyslot::{Insertion, SlotTable};
///
/// let mut table = SlotTable::new();
/// let landed = table.insert("12AB34", "hello").unwrap();
/// assert!(matches!(landed, Insertion::Placed(_)));
///
/// assert_eq!(table.search("12AB34").unwrap(), Some("hello"));
/// table.remove("12AB34").unwrap();
/// assert_eq!(table.search("12AB34").unwrap(), None);
/// assert!(table.search("12ab34").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct SlotTable {
    pub(crate) slots: Vec<Slot>,
    pub(crate) config: Config,
    /// Number of stored keys.
    pub(crate) len: usize,
    /// Number of live slots.
    pub(crate) live: usize,
}

impl SlotTable {
    /// Creates an empty table with the default configuration (2500 slots).
    pub fn new() -> Self {
        Self::build(Config::default())
    }

    /// Creates an empty table with the given configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        if config.capacity < 2 {
            return Err(Error::InvalidConfig("capacity must be at least 2"));
        }
        if config.max_keys_per_slot == 0 {
            return Err(Error::InvalidConfig("max_keys_per_slot must be at least 1"));
        }
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        let mut slots = Vec::with_capacity(config.capacity);
        slots.resize_with(config.capacity, Slot::default);
        Self {
            slots,
            config,
            len: 0,
            live: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live slots.
    #[inline]
    pub fn live_slot_count(&self) -> usize {
        self.live
    }

    pub fn tombstone_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Tombstone))
            .count()
    }

    /// Slot indices visited when probing for `key`, in probe order.
    pub fn probe_sequence(&self, key: &Key) -> Probe {
        Probe::new(key, self.capacity())
    }

    /// Validates `key` and inserts it with `value`.
    ///
    /// See [`SlotTable::insert_key`] for landing rules.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<Insertion> {
        let key = Key::parse(key)?;
        self.insert_key(key, value)
    }

    /// Inserts an already validated key.
    ///
    /// The probe path is walked until an empty slot or `capacity` probes. If a
    /// live slot on the way already holds `key` the call is a no-op. Otherwise
    /// the key lands in, by preference:
    ///
    /// 1. the first live slot on the path with room, sharing its value;
    /// 2. the first tombstone on the path, revived with `value`;
    /// 3. the empty slot that ended the walk, made live with `value`.
    ///
    /// With none of these available the table is full for this key.
    pub fn insert_key(&mut self, key: Key, value: impl Into<String>) -> Result<Insertion> {
        let max_keys = self.config.max_keys_per_slot;
        let mut shared = None;
        let mut revivable = None;
        let mut vacant = None;

        for idx in self.probe_sequence(&key) {
            match &self.slots[idx] {
                Slot::Empty => {
                    vacant = Some(idx);
                    break;
                }
                Slot::Live(live) => {
                    if live.keys.contains(&key) {
                        trace!("insert {key}: already in slot {idx}");
                        return Ok(Insertion::Duplicate(idx));
                    }
                    if shared.is_none() && live.keys.len() < max_keys {
                        shared = Some(idx);
                    }
                }
                Slot::Tombstone => {
                    revivable.get_or_insert(idx);
                }
            }
        }

        if let Some(idx) = shared {
            if let Slot::Live(live) = &mut self.slots[idx] {
                live.keys.push(key);
                self.len += 1;
                debug!("insert {key}: shared slot {idx} ({} keys)", live.keys.len());
                return Ok(Insertion::Shared(idx));
            }
        }

        if let Some(idx) = revivable.or(vacant) {
            self.slots[idx] = Slot::Live(LiveSlot::new(key, value.into()));
            self.len += 1;
            self.live += 1;
            debug!("insert {key}: placed in slot {idx}");
            return Ok(Insertion::Placed(idx));
        }

        warn!("insert {key}: no slot available on probe path");
        Err(Error::TableFull(key))
    }

    /// Validates `key` and returns the value of the live slot holding it.
    pub fn search(&self, key: &str) -> Result<Option<&str>> {
        let key = Key::parse(key)?;
        Ok(self.get(&key))
    }

    /// Value of the live slot holding `key`, if any.
    pub fn get(&self, key: &Key) -> Option<&str> {
        let idx = self.find(key)?;
        match &self.slots[idx] {
            Slot::Live(live) => Some(live.value.as_str()),
            _ => None,
        }
    }

    /// Index of the live slot holding `key`. Tombstones and live slots without
    /// the key are skipped; an empty slot ends the search.
    pub fn find(&self, key: &Key) -> Option<usize> {
        for idx in self.probe_sequence(key) {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Live(live) if live.keys.contains(key) => return Some(idx),
                _ => {}
            }
        }
        None
    }

    /// Validates `key` and removes it. Returns the slot it was removed from.
    pub fn remove(&mut self, key: &str) -> Result<usize> {
        let key = Key::parse(key)?;
        self.remove_key(key)
    }

    /// Removes an already validated key. A slot left without keys becomes a
    /// tombstone.
    pub fn remove_key(&mut self, key: Key) -> Result<usize> {
        let idx = self.find(&key).ok_or(Error::NotFound(key))?;
        let now_empty = match &mut self.slots[idx] {
            Slot::Live(live) => {
                if let Some(pos) = live.keys.iter().position(|k| *k == key) {
                    live.keys.remove(pos);
                }
                live.keys.is_empty()
            }
            _ => return Err(Error::NotFound(key)),
        };

        self.len -= 1;
        if now_empty {
            self.slots[idx] = Slot::Tombstone;
            self.live -= 1;
            debug!("remove {key}: slot {idx} is now a tombstone");
        } else {
            debug!("remove {key}: removed from slot {idx}");
        }
        Ok(idx)
    }

    /// Resets every slot to empty, tombstones included.
    pub fn clear(&mut self) {
        self.slots.fill_with(Slot::default);
        self.len = 0;
        self.live = 0;
        debug!("table cleared");
    }

    /// `(index, key_count)` for every live slot, ascending by index.
    pub fn occupancy(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.live_slots().map(|view| (view.index, view.keys.len()))
    }

    /// Every live slot, ascending by index.
    pub fn live_slots(&self) -> impl Iterator<Item = SlotView<'_>> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Live(live) => Some(SlotView {
                index,
                keys: live.keys.as_slice(),
                value: live.value.as_str(),
            }),
            _ => None,
        })
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}
