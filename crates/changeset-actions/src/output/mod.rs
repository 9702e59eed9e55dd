mod outputs;
mod status;

pub(crate) use outputs::{ActionOutputs, annotate_error};
pub(crate) use status::{PlainTextStatusFormatter, StatusFormatter};
