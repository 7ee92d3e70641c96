#![allow(non_snake_case)]

pub mod error;
pub mod games;
pub mod utils;
pub mod expectiminimax;
pub mod negamax;
pub mod self_play;
