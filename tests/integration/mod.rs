//! Integration tests for the lockstep traversal engine

mod recursive_walk;
mod test_utils;
