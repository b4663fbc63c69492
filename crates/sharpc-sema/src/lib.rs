//! The conversion engine: implicit and explicit conversion resolution,
//! user-defined operator overload resolution, and the encompassing-type
//! tie-break machinery.

pub mod context;
pub mod conversion;
pub mod overload;

pub use context::{ConversionContext, ResolveFlags};
pub use conversion::{
    explicit_conversion, explicit_standard_conversion, implicit_conversion,
    implicit_conversion_exists, implicit_conversion_required, implicit_standard_conversion,
    implicit_standard_conversion_exists, is_unsigned_to_real,
};
pub use overload::{find_most_encompassed, find_most_encompassing};
