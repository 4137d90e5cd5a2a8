pub mod iw;

pub use iw::IwScanner;
