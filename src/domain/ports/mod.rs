mod adapter;
mod upstream;

pub use adapter::Adapter;
pub use upstream::Upstream;
