//! Database Models
//!
//! Row structs and closed enums for every SurrealDB table. Rows carry their own
//! string key field (`order_id`, `tracking_id`, ...) which doubles as the record
//! key, so queries never round-trip `RecordId` values.

pub mod cart;
pub mod delivery;
pub mod notification;
pub mod order;
pub mod payment;
pub mod stock;

pub use cart::{CartItem, CartItemCreate};
pub use delivery::{DeliveryStatus, DeliveryStatusHistory, DeliveryTracking};
pub use notification::{Notification, NotificationType};
pub use order::{Order, OrderDetail, OrderItem, OrderKind, OrderStatus};
pub use payment::{PaymentMethodType, PaymentStatus, PaymentTransaction};
pub use stock::{RetailerProduct, WholesalerProduct};
