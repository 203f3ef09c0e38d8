mod attachment_errors;
mod configuration_errors;
mod validation_errors;

pub use attachment_errors::*;
pub use configuration_errors::*;
pub use validation_errors::*;
