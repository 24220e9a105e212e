//! Row structs for the account aggregate and its owned resources.
//!
//! Every struct is `FromRow` + `Serialize`; this service never writes these
//! tables except `jobs`, so there are no update DTOs.

pub mod account;
pub mod channel;
pub mod job;
pub mod playlist;
pub mod rating;
pub mod video;
