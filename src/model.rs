pub(crate) mod collage;
pub(crate) mod settings;
pub(crate) mod tile;
