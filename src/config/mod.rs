//! Configuration modules for the Docentia API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables at startup:
//!
//! - [`cors`]: CORS allowed origins
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: JWT signing secret and token lifetime

pub mod cors;
pub mod database;
pub mod jwt;
