//! Mobile-money payment gateway integration
//!
//! Request/response records, local validation, the authenticated HTTP
//! transport and the TemboPlus client built on top of them.

pub mod amount;
pub mod catalog;
pub mod helpers;
pub mod providers;
pub mod traits;
pub mod transport;
pub mod types;
pub mod validation;
pub mod webhook;
