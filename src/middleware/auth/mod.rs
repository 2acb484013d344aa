pub mod authenticated;

pub use authenticated::AuthFailure;
