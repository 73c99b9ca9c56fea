//! Built-in pricing strategies.

mod constant_product;

pub use constant_product::ConstantProductStrategy;
