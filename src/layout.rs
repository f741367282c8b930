pub(crate) mod shelf;
