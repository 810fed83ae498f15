//! # Storage Module
//!
//! File-backed input for the zero-copy layer: a read-only memory mapping
//! that serves as the borrowed buffer behind [`RecordView`](crate::records::RecordView)s
//! and record iteration.

pub mod mmap;

pub use mmap::MappedReader;
