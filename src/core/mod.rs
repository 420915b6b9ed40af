pub mod classifier;
pub mod codec;
pub mod dispatcher;
pub mod documents;
pub mod gateway;
#[cfg(test)]
pub(crate) mod testing;

