pub mod delivery;
pub mod dispatch;

pub use delivery::{DeliveryError, DeliveryReceipt, MessageDelivery};
pub use dispatch::{DispatchReport, DispatchService};
