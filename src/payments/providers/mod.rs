//! Concrete gateway implementations of the MobileMoneyGateway trait.

pub mod temboplus;

pub use temboplus::TemboPlusClient;
