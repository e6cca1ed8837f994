pub mod harness;

#[allow(unused_imports)]
pub use harness::{deps_with, isolated_pool, sample_bill, test_pool};
