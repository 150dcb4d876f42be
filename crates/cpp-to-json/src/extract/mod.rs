//! Per-translation-unit extraction: type spellings, aliases, qualified
//! names, value-type candidates and free functions.

pub mod alias;
pub mod functions;
pub mod qualified_name;
pub mod type_text;
pub mod value_type;

pub use alias::AliasMap;
pub use functions::collect_functions;
pub use qualified_name::full_name;
pub use type_text::simplify;
pub use value_type::{Evaluation, RejectedValueType, ValueTypeScan, collect_value_types, evaluate};
