#![allow(dead_code)]

pub mod generator;
pub mod renderer;
pub mod transcripts;
