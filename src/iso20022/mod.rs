pub mod pain001;

pub use pain001::{emit, serialize, PaymentDocument, PAIN001_NAMESPACE};
