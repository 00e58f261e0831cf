//! # vireo-factory
//!
//! Key-indexed component factories. A [`Registry`] maps keys to
//! type-erased [`Creator`]s, so the scene graph and its traversals never
//! name a concrete solver, force field, or collision pipeline type.
//!
//! ## Key Types
//!
//! - [`Registry`] — ordered multi-map from key to creators, with a lazily
//!   initialized process-wide instance per `(Key, Object, Argument)`
//! - [`Creator`] — uniform creation interface
//! - [`TypeCreator`] / [`FnCreator`] — creator adapters bound to a type's
//!   own construction hook or to an external function
//! - [`registration_log`] — diagnostic record of every registration

pub mod creator;
pub mod log;
pub mod registry;

pub use creator::{Creatable, Creator, FnCreator, TypeCreator};
pub use log::{print_registration_log, registration_log, short_type_name, RegistrationRecord};
pub use registry::Registry;
