//! IP-range access control for the health surface.

mod gate;
mod range;

pub use gate::{AllowList, IpAccessGate};
pub use range::{InvalidRange, IpRange};
