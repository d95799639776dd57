// Pedantic: suppress noise for internal crate code.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]

pub mod chart;
pub mod config;
pub mod extract;
pub mod keyword;
pub mod labels;
pub mod loader;
pub mod markdown;
pub mod types;
pub mod util;
