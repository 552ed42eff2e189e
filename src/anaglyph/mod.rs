pub(crate) mod compositor;
pub(crate) mod preset;
pub(crate) mod transform;
