//! Fixed-capacity object pool
//!
//! Slots are allocated once and reused forever. There is no release call:
//! an entity goes back to the pool by deactivating itself.

/// Something that can live in a [`Pool`]
pub trait Poolable {
    fn is_active(&self) -> bool;
}

/// Cyclic pool of reusable entities
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    /// Index returned by the last successful acquire
    cursor: usize,
}

impl<T: Poolable> Pool<T> {
    /// Build a pool of `capacity` entities using `make(slot_index)`
    pub fn new(capacity: usize, mut make: impl FnMut(usize) -> T) -> Self {
        assert!(capacity > 0, "pool capacity must be at least 1");
        Self {
            slots: (0..capacity).map(&mut make).collect(),
            // The first scan starts at slot 0
            cursor: capacity - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Find the next inactive slot, scanning forward from the last one handed out.
    ///
    /// Returns `None` when every slot is active. The caller is responsible for
    /// activating the entity.
    pub fn acquire(&mut self) -> Option<usize> {
        let len = self.slots.len();
        for _ in 0..len {
            self.cursor = (self.cursor + 1) % len;
            if !self.slots[self.cursor].is_active() {
                return Some(self.cursor);
            }
        }
        None
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }

    /// Active entities only
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter(|s| s.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Default)]
    struct Slot {
        active: bool,
    }

    impl Poolable for Slot {
        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn pool(n: usize) -> Pool<Slot> {
        Pool::new(n, |_| Slot::default())
    }

    #[test]
    fn test_acquire_rotates_through_slots() {
        let mut pool = pool(3);
        // Without activating anything the cursor still advances
        assert_eq!(pool.acquire(), Some(0));
        assert_eq!(pool.acquire(), Some(1));
        assert_eq!(pool.acquire(), Some(2));
        assert_eq!(pool.acquire(), Some(0));
    }

    #[test]
    fn test_acquire_skips_active() {
        let mut pool = pool(3);
        pool.get_mut(1).unwrap().active = true;
        assert_eq!(pool.acquire(), Some(0));
        assert_eq!(pool.acquire(), Some(2));
        assert_eq!(pool.acquire(), Some(0));
    }

    #[test]
    fn test_exhausted_pool_returns_none() {
        let mut pool = pool(2);
        for _ in 0..2 {
            let i = pool.acquire().unwrap();
            pool.get_mut(i).unwrap().active = true;
        }
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.acquire(), None);

        // Deactivating returns the slot
        pool.get_mut(0).unwrap().active = false;
        assert_eq!(pool.acquire(), Some(0));
    }

    proptest! {
        #[test]
        fn prop_active_never_exceeds_capacity(
            capacity in 1usize..16,
            ops in proptest::collection::vec(any::<(bool, u8)>(), 0..200),
        ) {
            let mut pool = pool(capacity);
            for (spawn, victim) in ops {
                if spawn {
                    match pool.acquire() {
                        Some(i) => {
                            prop_assert!(!pool.get(i).unwrap().active);
                            pool.get_mut(i).unwrap().active = true;
                        }
                        None => prop_assert_eq!(pool.active_count(), capacity),
                    }
                } else {
                    let i = victim as usize % capacity;
                    pool.get_mut(i).unwrap().active = false;
                }
                prop_assert!(pool.active_count() <= capacity);
                prop_assert_eq!(pool.capacity(), capacity);
            }
        }
    }
}
