pub(crate) mod access;
pub(crate) mod ai;
pub(crate) mod storage;
