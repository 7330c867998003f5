//! Shared mutable state, one alias for the whole kernel.
//!
//! The tick loop and the periodic stats logger are the only two tasks that
//! ever share a structure; both go through this.

use parking_lot::Mutex;
use std::sync::Arc;

pub type Shared<T> = Arc<Mutex<T>>;

pub fn new_shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
