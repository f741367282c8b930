pub(crate) mod cache;
pub(crate) mod composite;
pub(crate) mod crop;
pub(crate) mod export;
pub(crate) mod mask;
