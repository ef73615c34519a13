pub mod backends;

pub use backends::*;

pub mod prelude {
    pub use super::backends::*;
    pub use ab_core::ResultCache;
}
