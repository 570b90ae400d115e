#![forbid(unsafe_code)]

pub mod repository;
