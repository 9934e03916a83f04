pub mod broadcast;
pub mod frame;
pub mod image;

pub use broadcast::{ImageBroadcaster, ImageReceiver, SubscriptionId};
pub use frame::{Frame, FramePayload};
pub use image::{ImagePayload, IntensityImage, Peak};
