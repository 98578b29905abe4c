pub(crate) mod color;
pub(crate) mod decode;
pub(crate) mod filter;
pub(crate) mod font;
