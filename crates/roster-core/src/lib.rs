pub mod allocator;
pub mod assembler;
pub mod config;
pub mod crew;
pub mod db;
pub mod directory;
pub mod error;
pub mod io;
pub mod lock;
pub mod paths;
pub mod record;
pub mod seat;
pub mod types;
pub mod view;

pub use assembler::RosterAssembler;
pub use error::{Result, RosterError};
