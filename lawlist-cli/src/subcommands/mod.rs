pub(crate) mod inspect;
pub(crate) mod label;
pub(crate) mod render;
pub(crate) mod stylesheet;
