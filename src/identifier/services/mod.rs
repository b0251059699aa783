//! Identifier allocation service.

mod allocator;

pub use allocator::{IdAllocationError, IdAllocationResult, IdAllocator};
