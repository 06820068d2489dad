#![doc = include_str!("../README.md")]

pub mod board;
pub mod pool;
pub mod heuristic;
pub mod snail;
pub mod solver;
pub mod stats;
