pub mod form;
pub mod id;
pub mod record;
pub mod validation;

pub use form::{Draft, Field, FormMode, FormState};
pub use id::{IdGenerator, IdStrategy};
pub use record::{Record, RecordList};
pub use validation::{INVALID_EMAIL_MESSAGE, ValidationError, is_valid_email, validate_fields};
