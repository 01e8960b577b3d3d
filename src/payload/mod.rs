//! Event messages delivered from the front-end

pub mod message;
pub mod position;

pub use message::{message_fields, EventPayload};
pub use position::{
    image_data_position, relative_position, supplement_mouse_positions, BoundingRect,
    ImageGeometry,
};
