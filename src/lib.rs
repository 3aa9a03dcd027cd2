//! Spiralling Cells - cyclic cellular automaton on a toroidal grid.
//!
//! Every cell holds one of N states. Each generation a cell advances to the
//! next state (mod N) if any neighbour currently holds that next state. From
//! random noise this grows rotating spirals.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration and seed types
//! - `compute`: Grid storage, neighbourhood tables, the evolution engine
//! - `archive`: Binary save/restore of a run
//!
//! # Example
//!
//! ```rust,no_run
//! use spiralling_cells::{
//!     archive::{ArchiveSource, decode, encode},
//!     compute::Automaton,
//!     schema::{AutomatonConfig, Neighbourhood},
//! };
//!
//! let config = AutomatonConfig::new(200, 200, 8, Neighbourhood::VonNeumann);
//! let mut automaton = Automaton::new(config, Some(42)).unwrap();
//!
//! for _ in 0..100 {
//!     automaton.step(Neighbourhood::VonNeumann);
//! }
//! println!("Entropy after 100 steps: {}", automaton.entropy(Neighbourhood::VonNeumann));
//!
//! let bytes = encode(&automaton.to_archive(ArchiveSource::Current));
//! automaton.load(&bytes).unwrap();
//! assert_eq!(automaton.iteration(), 100);
//! # let _ = decode(&bytes);
//! ```

pub mod archive;
pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use archive::{ArchiveError, ArchiveSource, ArchiveState};
pub use compute::{Automaton, AutomatonError, AutomatonStats, Grid};
pub use schema::{AutomatonConfig, ConfigError, Neighbourhood, Pattern, Seed};
