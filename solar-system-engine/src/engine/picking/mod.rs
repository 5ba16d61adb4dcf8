/// Pointer ray picking, hover and click-to-select
pub mod resolver;
