#![deny(missing_docs)]
#![doc = "Core error, tensor, and value types shared by the TTK testing engine."]

pub mod errors;
pub mod tensor;
pub mod value;

pub use errors::{ErrorInfo, TtkError};
pub use tensor::{DType, NumericArray, Tensor, TensorData};
pub use value::{table, Value, ValueKind};
