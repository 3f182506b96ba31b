pub mod emitter;
pub mod types;

pub use emitter::EventEmitter;
pub use types::{
    AckKind, EngineEvent, EntityKind, ExternalAck, LifecycleEvent, OrderedLifecycleEvent,
};
