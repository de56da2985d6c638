pub(crate) mod migrate;
pub(crate) mod pipeline;
pub(crate) mod query;
pub(crate) mod serve;
