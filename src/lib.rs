pub mod error;
pub mod frame;
pub mod manager;
pub mod policy;
pub mod protection;
pub mod region;
pub mod sim;
pub mod stats;
