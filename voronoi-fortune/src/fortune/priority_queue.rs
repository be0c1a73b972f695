//--------------------------------------------------------------------
// priority_queue.rs
//--------------------------------------------------------------------
// Provides a binary heap whose items can be removed from the middle,
// through handles given out when they are queued
//--------------------------------------------------------------------

use std::cmp::Ordering;
use crate::error::*;

/// Refers to an item for as long as it stays in its queue.
/// Handles are never reused, so a stale one cannot reach another item.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueueHandle(usize);

/// A binary max-heap ordered by a comparison function: the top item is
/// the one that compares greatest.
pub struct PriorityQueue<T> {
    orderer: fn(&T, &T) -> Ordering,
    heap: Vec<(usize, T)>,
    // Heap slot of every handle ever given out, None once the item left
    slots: Vec<Option<usize>>
}

impl<T: Ord> PriorityQueue<T> {
    pub fn max() -> PriorityQueue<T> { PriorityQueue::new(T::cmp) }
    pub fn min() -> PriorityQueue<T> { PriorityQueue::new(|a: &T, b: &T| b.cmp(a)) }
}

impl<T> PriorityQueue<T> {
    pub fn new(orderer: fn(&T, &T) -> Ordering) -> PriorityQueue<T> {
        PriorityQueue { orderer, heap: Vec::with_capacity(16), slots: Vec::new() }
    }

    pub fn len(&self) -> usize { self.heap.len() }
    pub fn is_empty(&self) -> bool { self.heap.is_empty() }

    pub fn enqueue(&mut self, item: T) -> QueueHandle {
        let handle = self.slots.len();
        let slot = self.heap.len();
        self.heap.push((handle, item));
        self.slots.push(Some(slot));
        self.walk_up(slot);
        QueueHandle(handle)
    }

    pub fn peek(&self) -> Result<&T> {
        self.heap.first().map(|(_, item)| item).ok_or(VoronoiError::EmptyQueue("peek at"))
    }

    pub fn dequeue(&mut self) -> Result<T> {
        if self.heap.is_empty() { return Err(VoronoiError::EmptyQueue("dequeue from")); }
        self.take_slot(0)
    }

    pub fn remove(&mut self, handle: QueueHandle) -> Result<T> {
        if self.heap.is_empty() { return Err(VoronoiError::EmptyQueue("remove from")); }
        match self.slots.get(handle.0) {
            Some(&Some(slot)) => self.take_slot(slot),
            _ => Err(VoronoiError::StaleHandle)
        }
    }

    // Whether the items at both slots may stay in this relative order
    fn properly_ordered(&self, higher: usize, lower: usize) -> bool {
        (self.orderer)(&self.heap[higher].1, &self.heap[lower].1) != Ordering::Less
    }

    fn swap_slots(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.slots[self.heap[i].0] = Some(i);
        self.slots[self.heap[j].0] = Some(j);
    }

    fn walk_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.properly_ordered(parent, slot) { break; }
            self.swap_slots(parent, slot);
            slot = parent;
        }
        slot
    }

    fn walk_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            if left >= self.heap.len() { break; }

            let right = left + 1;
            let child = if right < self.heap.len() && !self.properly_ordered(left, right) { right } else { left };
            if self.properly_ordered(slot, child) { break; }

            self.swap_slots(slot, child);
            slot = child;
        }
    }

    // Moves the last item into the vacated slot and restores the heap around it
    fn take_slot(&mut self, slot: usize) -> Result<T> {
        let last = self.heap.len() - 1;
        self.swap_slots(slot, last);

        let (handle, item) = self.heap.pop().ok_or(VoronoiError::EmptyQueue("remove from"))?;
        self.slots[handle] = None;

        if slot < self.heap.len() {
            let slot = self.walk_up(slot);
            self.walk_down(slot);
        }
        Ok(item)
    }
}
