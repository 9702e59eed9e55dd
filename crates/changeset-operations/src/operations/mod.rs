mod canary_publish;
mod comment;
mod detect_add;
mod publish;
mod status;

pub use canary_publish::{CanaryInput, CanaryOutcome, CanaryPublishOperation};
pub use detect_add::{DetectAddInput, DetectAddOperation, DetectAddOutcome};
pub use publish::{PublishInput, PublishOperation, PublishOutcome};
pub use status::{StatusInput, StatusOperation, StatusOutput};
