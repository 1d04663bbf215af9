//! A binary min-heap priority queue.
//!
//! The tree builder repeatedly extracts the two lowest-weight nodes, so a
//! min-ordered heap is the natural fit (`std::collections::BinaryHeap` is
//! max-ordered). Generic over any `Ord` element; ordering among equal
//! elements is unspecified but deterministic for a fixed push sequence.

/// A min-heap that pops the smallest element first.
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    items: Vec<T>,
}

impl<T: Ord> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> MinHeap<T> {
    /// Create a new, empty heap.
    pub fn new() -> Self {
        MinHeap { items: Vec::new() }
    }

    /// Number of elements in the heap.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Push an element onto the heap.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Pop the smallest element, or `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.items.len() <= 1 {
            return self.items.pop();
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let smallest = self.items.pop();
        self.sift_down(0);
        smallest
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.items[index] >= self.items[parent] {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.items[left] < self.items[smallest] {
                smallest = left;
            }
            if right < len && self.items[right] < self.items[smallest] {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.items.swap(index, smallest);
            index = smallest;
        }
    }
}
