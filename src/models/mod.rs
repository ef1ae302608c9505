pub mod form_fields;
pub mod role;
pub mod user_record;

pub use form_fields::FormFields;
pub use role::Role;
pub use user_record::{parse_seed_rows, SeedRow, UserRecord, UserUpdate};
