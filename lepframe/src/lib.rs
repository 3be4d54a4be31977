// src/lib.rs
pub mod data {
    pub mod collection;
    pub mod event;
    pub mod io;
}

pub mod selection;
pub mod combine;
pub mod pipeline;
pub mod error;
